use pretty_assertions::assert_eq;

use super::*;

#[test]
fn equal_sequences_share_an_array() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let a = pool.reflect_constant_array::<i32, _>([1, 2, 3])?;
    let b = pool.reflect_constant_array::<i32, _>(vec![1, 2, 3])?;
    let longer = pool.reflect_constant_array::<i32, _>([1, 2, 3, 4])?;

    assert_eq!(a, b);
    assert!(std::ptr::eq(a.get(), b.get()));
    assert!(a != longer);
    assert_eq!(a.get(), &[1, 2, 3]);
    assert_eq!(pool.form(a.handle())?, crate::SlotForm::Array);
    Ok(())
}

#[test]
fn borrowed_items_are_accepted() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let items = vec![4_u8, 5];
    let by_ref = pool.define_static_array::<u8, _>(&items)?;
    let by_value = pool.define_static_array::<u8, _>(items)?;
    assert!(std::ptr::eq(by_ref, by_value));
    Ok(())
}

#[test]
fn empty_arrays_are_distinct_per_element_type() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let ints = pool.reflect_constant_array::<i32, _>(Vec::<i32>::new())?;
    let ints_again = pool.reflect_constant_array::<i32, _>([0_i32; 0])?;
    let bytes = pool.reflect_constant_array::<u8, _>(Vec::<u8>::new())?;

    assert_eq!(ints, ints_again);
    assert!(ints.handle() != bytes.handle());
    assert!(ints.get().is_empty());
    Ok(())
}

#[test]
fn elements_are_canonical_objects() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let array = pool.reflect_constant_array::<u16, _>([9_u16, 9])?;
    let nine = pool.reflect_constant(&9_u16)?;

    let parts = pool.components(array.handle())?;
    assert_eq!(
        &parts[..],
        &[
            Component::Type(TypeKey::of::<u16>()),
            Component::Constant(nine.handle()),
            Component::Constant(nine.handle()),
        ]
    );
    Ok(())
}

#[test]
fn nested_sequences_canonicalize_inner_first() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let outer = pool.reflect_constant_array::<Vec<i32>, _>(vec![vec![1, 2], vec![], vec![1, 2]])?;
    let [first, empty, third] = outer.get() else {
        panic!("expected three rows, got {:?}", outer.get());
    };
    assert!(std::ptr::eq(*first, *third));
    assert_eq!(*first, &[1, 2]);
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn static_string_is_nul_terminated() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let hello = pool.define_static_string("hello")?;

    assert_eq!(hello.len(), 5);
    assert_eq!(hello.as_bytes_with_nul().len(), 6);
    assert_eq!(hello.as_bytes_with_nul()[5], 0);
    assert_eq!(hello, "hello");
    assert_eq!(hello.to_string(), "hello");
    assert_eq!(format!("{hello:?}"), "\"hello\"");
    Ok(())
}

#[test]
fn static_strings_share_storage_by_content() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let owned = String::from("hello");
    let a = pool.define_static_string("hello")?;
    let b = pool.define_static_string(&owned)?;
    let other = pool.define_static_string("other")?;

    assert!(std::ptr::eq(a.as_str(), b.as_str()));
    assert!(!std::ptr::eq(a.as_str(), other.as_str()));
    Ok(())
}

#[test]
fn empty_static_string_is_just_the_terminator() -> Result<(), ReflectError> {
    let pool = ConstantPool::new();
    let empty = pool.define_static_string("")?;
    assert!(empty.is_empty());
    assert_eq!(empty.as_bytes_with_nul(), b"\0");
    Ok(())
}

#[test]
fn malformed_text_is_rejected() {
    assert_eq!(
        StaticStr::from_bytes_with_nul(b"abc"),
        Err(ReflectError::MalformedText {
            reason: "missing nul terminator",
        })
    );
    assert_eq!(
        StaticStr::from_bytes_with_nul(&[0xff, 0]),
        Err(ReflectError::MalformedText {
            reason: "not valid UTF-8",
        })
    );
    assert_eq!(
        StaticStr::from_bytes_with_nul(b"ok\0").map(StaticStr::as_str),
        Ok("ok")
    );
}
