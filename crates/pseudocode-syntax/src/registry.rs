//! Process-wide lookup of readers and writers.
//!
//! The built-in front and back ends are seeded on first use, according to
//! the enabled `read-*` / `write-*` features. Later registrations are
//! searched first, so an embedder can shadow a built-in language.

use crate::traits::{Reader, Writer};
use std::sync::{LazyLock, PoisonError, RwLock};

static READERS: LazyLock<RwLock<Vec<&'static dyn Reader>>> =
    LazyLock::new(|| RwLock::new(builtin_readers()));

static WRITERS: LazyLock<RwLock<Vec<&'static dyn Writer>>> =
    LazyLock::new(|| RwLock::new(builtin_writers()));

#[allow(unused_mut)]
fn builtin_readers() -> Vec<&'static dyn Reader> {
    let mut readers: Vec<&'static dyn Reader> = Vec::new();
    #[cfg(feature = "read-python")]
    readers.push(&crate::input::python::PYTHON_READER);
    readers
}

#[allow(unused_mut)]
fn builtin_writers() -> Vec<&'static dyn Writer> {
    let mut writers: Vec<&'static dyn Writer> = Vec::new();
    #[cfg(feature = "write-ib")]
    writers.push(&crate::output::ib::IB_WRITER);
    writers
}

/// Copy of a registry's contents, newest registration first.
fn snapshot<T: ?Sized>(registry: &RwLock<Vec<&'static T>>) -> Vec<&'static T> {
    let entries = registry.read().unwrap_or_else(PoisonError::into_inner);
    entries.iter().rev().copied().collect()
}

/// Add a reader. It takes precedence over any reader already registered
/// for the same language or extension.
pub fn register_reader(reader: &'static dyn Reader) {
    tracing::debug!(language = reader.language(), "registering reader");
    READERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(reader);
}

/// Add a writer. It takes precedence over any writer already registered
/// for the same language.
pub fn register_writer(writer: &'static dyn Writer) {
    tracing::debug!(language = writer.language(), "registering writer");
    WRITERS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(writer);
}

pub fn reader_for_language(lang: &str) -> Option<&'static dyn Reader> {
    snapshot(&READERS)
        .into_iter()
        .find(|reader| reader.language() == lang)
}

/// Find a reader by file extension, without the dot. Case is ignored so
/// `PY` finds the Python reader.
pub fn reader_for_extension(ext: &str) -> Option<&'static dyn Reader> {
    snapshot(&READERS).into_iter().find(|reader| {
        reader
            .extensions()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    snapshot(&WRITERS)
        .into_iter()
        .find(|writer| writer.language() == lang)
}

/// Registered readers, one per language, in registration order.
pub fn readers() -> Vec<&'static dyn Reader> {
    let mut seen = Vec::new();
    let mut unique: Vec<_> = snapshot(&READERS)
        .into_iter()
        .filter(|reader| {
            let fresh = !seen.contains(&reader.language());
            seen.push(reader.language());
            fresh
        })
        .collect();
    unique.reverse();
    unique
}

/// Registered writers, one per language, in registration order.
pub fn writers() -> Vec<&'static dyn Writer> {
    let mut seen = Vec::new();
    let mut unique: Vec<_> = snapshot(&WRITERS)
        .into_iter()
        .filter(|writer| {
            let fresh = !seen.contains(&writer.language());
            seen.push(writer.language());
            fresh
        })
        .collect();
    unique.reverse();
    unique
}
