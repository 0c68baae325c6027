#![doc = include_str!("../README.md")]

#![no_std]

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

extern crate alloc;

pub mod error;
pub mod index;
pub mod kv;
pub mod map;
pub mod serial;

mod store;

use hashbrown::HashMap;

pub use error::{Error, Result};
pub use index::SlotIndex;
pub use kv::BijectionKvMap;
pub use map::{BijectionMap, Cursor, Iter};
pub use serial::SerialBijectionMap;

/// A [`BijectionMap`] indexed by `hashbrown` tables instead of B-trees.
pub type HashBijectionMap<K, V> = BijectionMap<K, V, HashMap<K, usize>, HashMap<V, usize>>;

/// A [`BijectionKvMap`] indexed by `hashbrown` tables instead of B-trees.
pub type HashBijectionKvMap<K, V> = BijectionKvMap<K, V, HashMap<K, usize>, HashMap<V, usize>>;

/// A [`SerialBijectionMap`] indexed by a `hashbrown` table instead of a B-tree.
pub type HashSerialBijectionMap<K> = SerialBijectionMap<K, HashMap<K, usize>>;
