/*
 * Responsibility
 * - Public surface of the middleware layer
 *   - auth: bearer verification + gate pipelines (per route)
 *   - cors / http: cross-cutting layers (whole router)
 */
pub mod auth;
pub mod cors;
pub mod http;
