/*!
Implementations of cryptographic algorithms.

This module provides concrete provider bindings behind the
cryptographic algorithm interfaces.
*/

// Keystream cipher algorithms
pub mod symmetric;

// Re-export factory functions
pub use symmetric::create_keystream;
