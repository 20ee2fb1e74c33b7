pub mod revocation;
