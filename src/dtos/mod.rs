//! DTOs module - Data Transfer Objects
//!
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod user;

pub use user::{
    CreateUserDTO, LoginDTO, LoginResponseDTO, RegisterDTO, RegisterResponseDTO, UserDTO,
};
