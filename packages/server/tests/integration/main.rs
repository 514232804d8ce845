mod admin;
mod health;
mod students;
