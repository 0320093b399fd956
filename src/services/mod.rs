/*
 * Responsibility
 * - Domain services the handlers and middleware call into
 */
pub mod auth;
pub mod authz;
pub mod password;
pub mod validation;
