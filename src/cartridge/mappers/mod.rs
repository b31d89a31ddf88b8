// Mappers module - cartridge mapper implementations and the creation factory
//
// Only mapper 0 (NROM) is implemented; every other mapper id is a supported-at-the-type-
// level but rejected-at-runtime `UnknownMapper` error, per this core's scope.

mod mapper0;

pub use mapper0::Mapper0;

use super::{Cartridge, Mapper};
use std::fmt;

/// Error constructing a mapper for a cartridge's header-declared mapper id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperError {
    UnknownMapper(u8),
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperError::UnknownMapper(id) => write!(f, "unsupported mapper id {id}"),
        }
    }
}

impl std::error::Error for MapperError {}

/// Creates the mapper implementation for `cartridge.mapper`.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.mapper {
        0 => Ok(Box::new(Mapper0::new(cartridge))),
        other => Err(MapperError::UnknownMapper(other)),
    }
}
