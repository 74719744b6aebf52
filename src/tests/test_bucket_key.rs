use std::{
    collections::{HashMap, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
};

use crate::{BucketKey, CallArgs, Value, call_args};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn equal_arguments_give_equal_keys() {
    let a = BucketKey::from(call_args![1, 2; three = 3, four = 4]);
    let b = BucketKey::from(CallArgs::new().arg(1).arg(2).kwarg("three", 3).kwarg("four", 4));

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn keyword_order_does_not_matter() {
    let a = BucketKey::from(call_args![; one = 1, two = 2]);
    let b = BucketKey::from(call_args![; two = 2, one = 1]);

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn positional_order_matters() {
    let a = BucketKey::from(call_args![1, 2]);
    let b = BucketKey::from(call_args![2, 1]);

    assert_ne!(a, b);
}

#[test]
fn positional_and_keyword_values_do_not_collide() {
    let positional = BucketKey::from(call_args![1]);
    let keyword = BucketKey::from(call_args![; one = 1]);
    let empty = BucketKey::from(call_args![]);

    assert_ne!(positional, keyword);
    assert_ne!(positional, empty);
    assert_ne!(keyword, empty);
}

#[test]
fn integer_widths_normalise() {
    let small = BucketKey::from(call_args![1u8]);
    let large = BucketKey::from(call_args![1i64]);
    let unsigned = BucketKey::from(call_args![1usize]);

    assert_eq!(small, large);
    assert_eq!(large, unsigned);
    assert_ne!(
        BucketKey::from(call_args![1]),
        BucketKey::from(call_args!["1"])
    );
}

#[test]
fn usable_as_map_key() {
    let mut map = HashMap::new();
    map.insert(BucketKey::from(call_args!["alice"]), 1);
    map.insert(BucketKey::from(call_args!["bob"]), 2);

    assert_eq!(map.get(&BucketKey::from(call_args!["alice"])), Some(&1));
    assert_eq!(map.get(&BucketKey::from(call_args!["carol"])), None);
}

#[test]
fn display_renders_call_syntax() {
    let key = BucketKey::from(call_args![1, "a", Some(true), vec![1, 2]; k = ()]);
    assert_eq!(key.to_string(), r#"(1, "a", true, [1, 2], k=None)"#);

    assert_eq!(BucketKey::from(CallArgs::new()).to_string(), "()");
}

#[test]
fn accessors_expose_arguments() {
    let key = BucketKey::from(call_args![1; two = 2]);

    assert_eq!(key.positional(), &[Value::Int(1)]);
    assert_eq!(key.keyword_arg("two"), Some(&Value::Int(2)));
    assert_eq!(key.args().get(0), Some(&Value::Int(1)));
    assert_eq!(key.get(1), None);
    assert!(!key.is_empty());
}
