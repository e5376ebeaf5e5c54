//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for the `/users` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - User registration handler
//! ├── signin.rs   - User authentication handler
//! ├── validate.rs - Token validation handler
//! └── profile.rs  - Profile read/update handlers
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /users/signup
//! - **`signin`** - POST /users/signin
//! - **`validate_token`** - POST /users/validate-token
//! - **`get_profile`** / **`update_profile`** - GET/PUT /users/profile
//! - **`get_user_profile`** - GET /users/{user_id}/profile

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Sign-in handler
pub mod signin;

/// Token validation handler
pub mod validate;

/// Profile handlers
pub mod profile;

// Re-export commonly used types
pub use types::{SigninRequest, SigninResponse, SignupRequest, ValidateTokenRequest, ValidateTokenResponse};

// Re-export handlers
pub use profile::{get_profile, get_user_profile, update_profile};
pub use signin::signin;
pub use signup::signup;
pub use validate::validate_token;
