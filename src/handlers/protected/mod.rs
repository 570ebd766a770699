// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT Authentication Required
// Route Prefix: /leads/*
// Middleware: jwt_auth_middleware (route layer)

pub mod leads;

pub use leads::*;
