//! Authentication Module
//!
//! This module handles user registration, sign-in, token management and the
//! user directory.
//!
//! # Architecture
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for the `/users` endpoints
//!
//! # Authentication Flow
//!
//! 1. **Sign up**: username, email and password → user created (201)
//! 2. **Sign in**: username or email plus password → JWT token returned
//! 3. **Protected routes**: `Authorization: Bearer <token>` → `auth_middleware`
//!    resolves the user and handlers read it through `AuthUser`
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are HS256 JWTs, valid for 7 days by default
//! - Invalid credentials return one generic message (no user enumeration)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for account endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::{get_profile, get_user_profile, signin, signup, update_profile, validate_token};
pub use sessions::{Claims, TokenError, TokenIssuer};
pub use users::User;
