//! Per-type capabilities looked up by [`TypeId`](core::any::TypeId).
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a type-erased capability, e.g. a custom encoder for one type.
//! - [`FromType`]: builds a capability for a concrete type.
//! - [`TypeMeta`]: the [`TypeInfo`](crate::info::TypeInfo) of a type plus its capability table.
//! - [`TypeRegistry`]: the store of `TypeMeta`s.
//!
//! Capabilities are defined by the crates that consume them. The codec crate,
//! for instance, registers its custom encode/decode contracts here and checks
//! them before falling back to reflection.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use type_meta::TypeMeta;
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
