use crate::{
    ByComponents, Components, ConstantPool, FromComponents, Reflect, ReflectError, Serializer,
    StaticStr,
};

fn text_from(mut args: Components<'_>) -> Result<StaticStr, ReflectError> {
    let bytes = args.take_constant()?;
    let pool = args.pool();
    args.finish()?;
    StaticStr::from_bytes_with_nul(pool.array::<u8>(bytes)?)
}

impl Reflect for String {
    type Target = StaticStr;
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_string(self)
    }
}

impl FromComponents for String {
    fn deserialize(args: Components<'_>) -> Result<StaticStr, ReflectError> {
        text_from(args)
    }
}

impl Reflect for Box<str> {
    type Target = StaticStr;
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_string(self)
    }
}

impl FromComponents for Box<str> {
    fn deserialize(args: Components<'_>) -> Result<StaticStr, ReflectError> {
        text_from(args)
    }
}

/// A string literal identified by its text.
///
/// A bare `&'static str` is a reference: it keys on where its bytes live,
/// so two equal literals stored apart get different slots. `Literal` keys
/// on the text, and its target is the [`StaticStr`] that
/// [`ConstantPool::define_static_string`] returns for the same text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal(pub &'static str);

impl Literal {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Move the literal onto its canonical storage.
    ///
    /// The returned reference is shared by every equal text, so it can
    /// key the pool by address and still compare by content.
    pub fn normalize(self, pool: &ConstantPool) -> Result<&'static str, ReflectError> {
        pool.define_static_string(self.0).map(StaticStr::as_str)
    }
}

impl From<&'static str> for Literal {
    fn from(text: &'static str) -> Self {
        Literal(text)
    }
}

impl Reflect for Literal {
    type Target = StaticStr;
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_string(self.0)
    }
}

impl FromComponents for Literal {
    fn deserialize(args: Components<'_>) -> Result<StaticStr, ReflectError> {
        text_from(args)
    }
}
