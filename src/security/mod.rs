pub mod link_verifier;

pub use link_verifier::LinkVerifier;
