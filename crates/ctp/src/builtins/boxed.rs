use crate::{
    ByConstants, Constant, Constants, FromConstants, ReflectCx, Reflect, ReflectError, Serializer,
};

/// A box is transparent: [`Reflect::reflect_constant`] hands back the very
/// object its contents canonicalize to, so `Param<Box<T>>` and `Param<T>`
/// share slots.
///
/// `serialize` and the constants form only run when a box is pushed
/// through [`ReflectCx::canonicalize`] directly. That yields a slot seeded
/// with `Box<T>` whose single component is the contents' canonical object.
impl<T: Reflect> Reflect for Box<T> {
    type Target = T::Target;
    type Forms = ByConstants;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_constant(&**self)
    }

    fn reflect_constant(&self, cx: ReflectCx<'_>) -> Result<Constant<T::Target>, ReflectError> {
        (**self).reflect_constant(cx)
    }
}

impl<T: Reflect> FromConstants for Box<T> {
    fn deserialize_constants(mut args: Constants<'_>) -> Result<T::Target, ReflectError> {
        let target = args.take::<T>()?;
        args.finish()?;
        Ok(target)
    }
}
