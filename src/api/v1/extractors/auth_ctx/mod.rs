/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Provide the verified Principal of the current request to handlers
 * - axum wiring lives in core, the type lives in types
 */

mod core;
mod types;

pub use self::core::Authenticated;
pub use types::Principal;
