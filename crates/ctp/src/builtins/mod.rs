//! Registry entries for standard containers and wrappers.
//!
//! | source            | target                      | form       |
//! |-------------------|-----------------------------|------------|
//! | `String`, `Box<str>` | [`StaticStr`](crate::StaticStr) | components |
//! | `Vec<T>`, `Box<[T]>` | `&'static [T::Target]`      | components |
//! | `Option<T>`       | `Option<T::Target>`         | constants  |
//! | `(A, B, ..)`      | `(A::Target, B::Target, ..)` | constants  |
//! | `Result<T, E>`    | `Result<T::Target, E::Target>` | key     |
//! | [`Literal`]       | [`StaticStr`](crate::StaticStr) | components |
//! | `Box<T>`          | `T::Target`, same object as `T` | forwarded |
//!
//! Borrowed views (`&'static str`, `&'static [T]`) are references and key
//! on their storage. Wrap text in [`Literal`] to key it on content.

mod boxed;
mod option;
mod result;
mod seq;
mod text;
mod tuple;

pub use text::Literal;
