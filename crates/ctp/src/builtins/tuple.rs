use crate::{ByConstants, Constants, FromConstants, Reflect, ReflectError, Serializer};

// Each member goes through `push_constant_or_object`: value members intern
// by content, `&'static` members keep pointing at their original storage.
macro_rules! impl_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Reflect),+> Reflect for ($($name,)+) {
            type Target = ($($name::Target,)+);
            type Forms = ByConstants;

            fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
                $(s.push_constant_or_object(&self.$idx)?;)+
                Ok(())
            }
        }

        impl<$($name: Reflect),+> FromConstants for ($($name,)+) {
            fn deserialize_constants(mut args: Constants<'_>) -> Result<Self::Target, ReflectError> {
                let target = ($(args.take::<$name>()?,)+);
                args.finish()?;
                Ok(target)
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_tuple!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
