pub mod login;
pub mod me;
pub mod set_password;
pub mod verify_email;
