/*
 * Responsibility
 * - public interface of the middleware layers (re-export)
 */
pub mod cors;
pub mod http;
