//! Integration and property-based tests for the resolution engine
//!
//! This crate holds the cross-crate test content: the family-tree
//! fixture, the list library expressed as ordinary clause content, and
//! property-based tests exploring unification and search invariants.

pub mod library;

#[cfg(test)]
mod family;


#[cfg(test)]
mod proptest_engine;
