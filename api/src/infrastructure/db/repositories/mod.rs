pub mod contact_repository_sqlx;
