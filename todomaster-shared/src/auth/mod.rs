/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: signed bearer token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Bearer Tokens**: HS256 signing, 7-day validity
/// - **Constant-time Comparison**: verification never short-circuits on the
///   password bytes

pub mod jwt;
pub mod password;
