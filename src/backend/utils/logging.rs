// src/backend/utils/logging.rs
// Debug-print wrappers that also work on native builds, so service tests
// can exercise logging code paths.

#[cfg(target_arch = "wasm32")]
pub fn info(message: impl AsRef<str>) {
    ic_cdk::println!("{}", message.as_ref());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn info(message: impl AsRef<str>) {
    println!("{}", message.as_ref());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(message: impl AsRef<str>) {
    ic_cdk::eprintln!("{}", message.as_ref());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(message: impl AsRef<str>) {
    eprintln!("{}", message.as_ref());
}
