use crate::{ByComponents, Components, FromComponents, Reflect, ReflectError, Serializer};

fn slice_from<T: Reflect>(mut args: Components<'_>) -> Result<&'static [T::Target], ReflectError> {
    let array = args.take_constant()?;
    let pool = args.pool();
    args.finish()?;
    pool.array::<T::Target>(array)
}

impl<T: Reflect> Reflect for Vec<T> {
    type Target = &'static [T::Target];
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_array::<T, _>(self)
    }
}

impl<T: Reflect> FromComponents for Vec<T> {
    fn deserialize(args: Components<'_>) -> Result<Self::Target, ReflectError> {
        slice_from::<T>(args)
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    type Target = &'static [T::Target];
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_array::<T, _>(self.iter())
    }
}

impl<T: Reflect> FromComponents for Box<[T]> {
    fn deserialize(args: Components<'_>) -> Result<Self::Target, ReflectError> {
        slice_from::<T>(args)
    }
}
