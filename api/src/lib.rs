// Module layout (Clean Architecture style)
// - bootstrap: configuration and dependency wiring
// - infrastructure: Postgres/redis/avatar storage/mail adapters
// - presentation: HTTP handlers and routing
// - application: ports, use cases and shared services
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
