use crate::{ByConstants, Constants, FromConstants, Reflect, ReflectError, Serializer};

// `None` pushes nothing, so every `None` of one `Option<T>` shares a key.
impl<T: Reflect> Reflect for Option<T> {
    type Target = Option<T::Target>;
    type Forms = ByConstants;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        match self {
            Some(value) => s.push_constant_or_object(value),
            None => Ok(()),
        }
    }
}

impl<T: Reflect> FromConstants for Option<T> {
    fn deserialize_constants(mut args: Constants<'_>) -> Result<Self::Target, ReflectError> {
        if args.is_empty() {
            return Ok(None);
        }
        let value = args.take::<T>()?;
        args.finish()?;
        Ok(Some(value))
    }
}
