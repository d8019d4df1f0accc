use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use rayon::prelude::*;

use super::*;
use crate::{ByComponents, Components, FromComponents, StaticStr};

#[test]
fn equal_keys_share_a_slot() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    assert!(pool.is_empty());

    let a = pool.reflect_constant(&5_i64)?;
    let b = pool.reflect_constant(&5_i64)?;
    assert_eq!(a.handle(), b.handle());
    assert!(std::ptr::eq(a.get(), b.get()));
    assert_eq!(pool.len(), 1);

    pool.reflect_constant(&6_i64)?;
    assert_eq!(pool.len(), 2);
    Ok(())
}

#[test]
fn define_static_object_returns_canonical_storage() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let first = pool.define_static_object(&'x')?;
    let second = pool.define_static_object(&'x')?;
    assert!(std::ptr::eq(first, second));
    assert_eq!(*first, 'x');
    Ok(())
}

#[test]
fn pools_do_not_share_slots() -> Result<(), ReflectError> {
    let left = ConstantPool::new();
    let right = ConstantPool::new();
    let a = left.reflect_constant(&1_u8)?;
    let b = right.reflect_constant(&1_u8)?;
    assert!(!a.ptr_eq(b));
    Ok(())
}

#[test]
fn slot_metadata_describes_the_value() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let text = pool.reflect_constant(&String::from("ab"))?;

    assert_eq!(pool.form(text.handle())?, SlotForm::Object);
    assert_eq!(pool.stored_type(text.handle())?, TypeKey::of::<StaticStr>());

    let parts = pool.components(text.handle())?;
    assert_eq!(parts[0], Component::Type(TypeKey::of::<String>()));
    let Some(bytes) = parts[1].handle() else {
        panic!("string key should name its byte array, got {parts:?}");
    };
    assert_eq!(pool.form(bytes)?, SlotForm::Array);
    assert_eq!(pool.array::<u8>(bytes)?, b"ab\0");
    Ok(())
}

#[test]
fn unknown_handle_is_reported() {
    let pool = ConstantPool::new();
    let handle = Handle::new(2, 40);
    assert_eq!(
        pool.object::<i32>(handle),
        Err(ReflectError::UnknownHandle { handle })
    );
}

#[test]
fn wrong_type_is_reported() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let handle = pool.reflect_constant(&9_i32)?.handle();
    match pool.object::<u32>(handle) {
        Err(ReflectError::TypeMismatch {
            handle: reported,
            found,
            ..
        }) => {
            assert_eq!(reported, handle);
            assert_eq!(found, "i32");
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn recursion_limit_stops_descent() {
    let pool = ConstantPool::with_config(PoolConfig::new().with_max_depth(2));
    let cx = pool.cx();
    let Ok(one) = cx.descend(TypeKey::of::<u8>()) else {
        panic!("first level is within the limit");
    };
    let Ok(two) = one.descend(TypeKey::of::<u8>()) else {
        panic!("second level is within the limit");
    };
    assert_eq!(two.depth(), 2);
    assert_eq!(
        two.descend(TypeKey::of::<u8>()).map(ReflectCx::depth),
        Err(ReflectError::RecursionLimit { ty: "u8", limit: 2 })
    );
}

#[test]
fn constants_hash_by_handle() -> Result<(), ReflectError> {
    use std::collections::HashSet;

    let pool = ConstantPool::new();
    let set: HashSet<Constant<u32>> = [1_u32, 2, 1, 2, 3]
        .iter()
        .map(|value| pool.reflect_constant(value))
        .collect::<Result<_, _>>()?;
    assert_eq!(set.len(), 3);
    Ok(())
}

/// Counts reconstructions to observe how many builders ran.
struct Counted(u32);

static BUILDS: AtomicUsize = AtomicUsize::new(0);

impl Reflect for Counted {
    type Target = u32;
    type Forms = ByComponents;

    fn serialize(&self, s: &mut Serializer<'_>) -> Result<(), ReflectError> {
        s.push_constant(&self.0)
    }
}

impl FromComponents for Counted {
    fn deserialize(mut args: Components<'_>) -> Result<u32, ReflectError> {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        let handle = args.take_constant()?;
        let pool = args.pool();
        args.finish()?;
        pool.object::<u32>(handle).copied()
    }
}

#[test]
fn concurrent_requests_agree_on_one_object() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let constants = (0..256)
        .into_par_iter()
        .map(|_| pool.reflect_constant(&Counted(77)))
        .collect::<Result<Vec<_>, _>>()?;

    let first = constants[0];
    assert!(constants.iter().all(|c| c.ptr_eq(first)));
    assert_eq!(*first.get(), 77);
    // Racing builders may each reconstruct, but only one slot is created.
    assert!(BUILDS.load(Ordering::SeqCst) >= 1);
    assert_eq!(pool.len(), 2);
    Ok(())
}

#[test]
fn concurrent_distinct_values_stay_distinct() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let handles = (0..1000_u32)
        .into_par_iter()
        .map(|value| pool.reflect_constant(&value).map(Constant::handle))
        .collect::<Result<Vec<_>, _>>()?;

    let unique: std::collections::HashSet<_> = handles.iter().copied().collect();
    assert_eq!(unique.len(), 1000);
    assert_eq!(pool.len(), 1000);
    Ok(())
}
