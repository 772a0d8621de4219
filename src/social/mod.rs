//! Social layer over issues: likes, bookmarks, comment threads and
//! mentions.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
