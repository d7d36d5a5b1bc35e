pub mod olog;
