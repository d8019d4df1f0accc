use crate::{ByKey, Component, ConstantPool, FromKey, Reflect, ReflectError, Scalar, Serializer};

// A tagged union: the alternative index always precedes the payload, so
// `Ok(x)` and `Err(y)` never share a key even when `x` and `y` do.
impl<T: Reflect, E: Reflect> Reflect for Result<T, E> {
    type Target = Result<T::Target, E::Target>;
    type Forms = ByKey;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        match self {
            Ok(value) => {
                s.push_tag(0);
                s.push_constant_or_object(value)
            }
            Err(value) => {
                s.push_tag(1);
                s.push_constant_or_object(value)
            }
        }
    }
}

impl<T: Reflect, E: Reflect> FromKey for Result<T, E> {
    fn deserialize_key(pool: &ConstantPool, key: &[Component]) -> Result<Self::Target, ReflectError> {
        let ty = std::any::type_name::<Self>();
        let (tag, payload) = match key {
            [tag, payload] => (*tag, *payload),
            [] | [_] => return Err(ReflectError::MissingComponent { ty }),
            [_, _, rest @ ..] => {
                return Err(ReflectError::TrailingComponents {
                    ty,
                    remaining: rest.len(),
                })
            }
        };
        let handle = payload.handle().ok_or(ReflectError::UnexpectedComponent {
            ty,
            expected: "constant or object",
            found: payload,
        })?;
        match tag {
            Component::Scalar(Scalar::Uint(0)) => {
                Ok(Ok(pool.object::<T::Target>(handle)?.clone()))
            }
            Component::Scalar(Scalar::Uint(1)) => {
                Ok(Err(pool.object::<E::Target>(handle)?.clone()))
            }
            found => Err(ReflectError::UnexpectedComponent {
                ty,
                expected: "alternative tag",
                found,
            }),
        }
    }
}
