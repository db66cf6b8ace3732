//! Advisory lookup of names in the live parameter namespace.
//!
//! A miss never fails an invocation: settings may name parameters that only
//! appear after a module is loaded at boot.

/// Outcome of a namespace lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The running system exposes this parameter.
    Known,
    /// The running system reports no such parameter.
    Unknown,
    /// The lookup could not give an answer.
    Indeterminate,
}

/// Source of truth for which parameter names exist.
pub trait NamespaceProbe {
    fn lookup(&self, name: &str) -> Presence;
}

/// Probe that never answers; used when lookups are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProbe;

impl NamespaceProbe for NoProbe {
    fn lookup(&self, _name: &str) -> Presence {
        Presence::Indeterminate
    }
}

/// Probe backed by the running kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

#[cfg(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "macos",
))]
impl NamespaceProbe for SystemProbe {
    fn lookup(&self, name: &str) -> Presence {
        use std::ffi::CString;
        use std::io;

        let c_name = match CString::new(name) {
            Ok(n) => n,
            Err(_) => return Presence::Indeterminate,
        };

        let result = unsafe {
            libc::sysctlbyname(
                c_name.as_ptr(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                0,
            )
        };

        if result == 0 {
            Presence::Known
        } else if io::Error::last_os_error().raw_os_error() == Some(libc::ENOENT) {
            Presence::Unknown
        } else {
            Presence::Indeterminate
        }
    }
}

#[cfg(target_os = "linux")]
impl NamespaceProbe for SystemProbe {
    fn lookup(&self, name: &str) -> Presence {
        use std::path::Path;

        let proc_sys = Path::new("/proc/sys");
        if !proc_sys.is_dir() {
            return Presence::Indeterminate;
        }
        if proc_sys.join(name.replace('.', "/")).exists() {
            Presence::Known
        } else {
            Presence::Unknown
        }
    }
}

#[cfg(not(any(
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "macos",
    target_os = "linux"
)))]
impl NamespaceProbe for SystemProbe {
    fn lookup(&self, _name: &str) -> Presence {
        Presence::Indeterminate
    }
}
