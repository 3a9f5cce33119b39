//! Integration test suite for yo.
//!
//! These tests load real taskfiles and run real shell commands, checking
//! what the commands leave behind in a scratch directory.
//!
//! # Test Categories
//!
//! - `taskfile`: resolution of taskfiles into task trees
//! - `execution`: ordering, argument forwarding, failure and termination
//! - `cli`: the `yo` binary end to end (Unix only)


mod execution;
