use pretty_assertions::assert_eq;

use super::*;
use crate::{ConstantPool, TypeKey};

static SHARED: i32 = 7;
static TWIN: i32 = 7;

#[test]
fn kinds_classify_identifier_safety() {
    assert!(is_identifier_safe::<i32>());
    assert!(is_identifier_safe::<f64>());
    assert!(is_identifier_safe::<()>());
    assert!(is_identifier_safe::<&'static str>());
    assert!(is_identifier_safe::<[u8; 3]>());
    assert!(!is_identifier_safe::<String>());
    assert!(!is_identifier_safe::<Option<i32>>());
    assert!(!is_identifier_safe::<(i32, i32)>());
}

#[test]
fn only_references_canonicalize_by_identity() {
    assert!(ReflectKind::Reference.is_reference());
    assert!(!ReflectKind::Scalar.is_reference());
    assert!(!ReflectKind::Structural.is_reference());
    assert!(!ReflectKind::Custom.is_identifier_safe());
}

#[test]
fn scalars_intern_by_value() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let a = pool.reflect_constant(&3_u16)?;
    let b = pool.reflect_constant(&3_u16)?;
    let c = pool.reflect_constant(&4_u16)?;
    assert_eq!(a, b);
    assert!(a.ptr_eq(b));
    assert!(a != c);
    assert_eq!(*a.get(), 3);
    Ok(())
}

#[test]
fn integer_types_stay_apart() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let narrow = pool.reflect_constant(&1_u8)?;
    let wide = pool.reflect_constant(&1_u64)?;
    assert!(narrow.handle() != wide.handle());
    assert_eq!(
        pool.components(narrow.handle())?.first().copied(),
        Some(Component::Type(TypeKey::of::<u8>()))
    );
    Ok(())
}

#[test]
fn floats_intern_by_bit_pattern() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let zero = pool.reflect_constant(&0.0_f64)?;
    let negative_zero = pool.reflect_constant(&-0.0_f64)?;
    let nan = pool.reflect_constant(&f64::NAN)?;
    assert!(zero != negative_zero);
    assert_eq!(nan, pool.reflect_constant(&f64::NAN)?);
    Ok(())
}

#[test]
fn references_intern_by_address() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let a = pool.reflect_constant(&&SHARED)?;
    let b = pool.reflect_constant(&&SHARED)?;
    let twin = pool.reflect_constant(&&TWIN)?;
    assert_eq!(a, b);
    assert!(a != twin);
    assert!(std::ptr::eq(*a.get(), &SHARED));
    assert!(std::ptr::eq(*twin.get(), &TWIN));
    Ok(())
}

#[test]
fn string_literals_intern_by_storage() -> Result<(), ReflectError> {
    static HELLO: &str = "hello";
    let pool = ConstantPool::new();
    let whole = pool.reflect_constant(&HELLO)?;
    let prefix = pool.reflect_constant(&&HELLO[..4])?;
    assert!(whole != prefix);
    assert_eq!(*whole.get(), "hello");
    assert_eq!(*prefix.get(), "hell");
    Ok(())
}

#[test]
fn arrays_push_each_element() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let a = pool.reflect_constant(&[1_i32, 2, 3])?;
    let b = pool.reflect_constant(&[1_i32, 2, 3])?;
    let c = pool.reflect_constant(&[3_i32, 2, 1])?;
    assert_eq!(a, b);
    assert!(a != c);

    let parts = pool.components(a.handle())?;
    assert_eq!(parts.len(), 4);
    assert!(parts[1..]
        .iter()
        .all(|part| matches!(part, Component::Constant(_))));
    Ok(())
}

#[test]
fn arrays_of_references_keep_identity() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let same = pool.reflect_constant(&[&SHARED, &SHARED])?;
    let mixed = pool.reflect_constant(&[&SHARED, &TWIN])?;
    assert!(same != mixed);

    let parts = pool.components(mixed.handle())?;
    assert!(matches!(parts[1], Component::Object(_)));
    assert!(parts[1] != parts[2]);
    Ok(())
}

/// Generic over the marker alone: the canonical object is a `T`.
fn canonical<T: IdentifierSafe>(pool: &ConstantPool, value: &T) -> Result<&'static T, ReflectError> {
    pool.reflect_constant(value).map(crate::Constant::get)
}

fn shareable<T: Clone + Send + Sync>(_: &T) {}

#[test]
fn identifier_safe_values_are_their_own_target() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let first = canonical(&pool, &[1_u8, 2])?;
    let again = canonical(&pool, &[1_u8, 2])?;
    let shared = canonical(&pool, &&SHARED)?;

    assert!(std::ptr::eq(first, again));
    assert_eq!(*first, [1, 2]);
    assert!(std::ptr::eq(*shared, &SHARED));
    shareable(first);
    shareable(shared);
    Ok(())
}
