//! Byte container for key material and decrypted dumps
//!
//! Contents are zeroed on drop and never printed. Key-sized buffers can
//! additionally be locked in memory so they are not swapped out; dumps are
//! left unlocked since they can be far larger than `RLIMIT_MEMLOCK`.

use std::ops::Deref;
use zeroize::Zeroize;

pub struct SecureBytes {
    data: Vec<u8>,
    locked: bool,
}

impl SecureBytes {
    /// Wrap `data` without locking it
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            locked: false,
        }
    }

    /// Wrap `data` and lock its pages in memory (best effort)
    pub fn locked(data: Vec<u8>) -> Self {
        let mut secure = Self::new(data);
        secure.locked = secure.lock_memory();
        secure
    }

    #[cfg(unix)]
    fn lock_memory(&self) -> bool {
        if self.data.is_empty() {
            return false;
        }
        // Fails without CAP_IPC_LOCK once the limit is hit; that is acceptable.
        unsafe { libc::mlock(self.data.as_ptr() as *const libc::c_void, self.data.len()) == 0 }
    }

    #[cfg(not(unix))]
    fn lock_memory(&self) -> bool {
        false
    }

    #[cfg(unix)]
    fn unlock_memory(&self) {
        unsafe {
            libc::munlock(self.data.as_ptr() as *const libc::c_void, self.data.len());
        }
    }

    #[cfg(not(unix))]
    fn unlock_memory(&self) {}

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.data.zeroize();
        if self.locked {
            self.unlock_memory();
        }
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<Vec<u8>> for SecureBytes {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deref_exposes_contents() {
        let secure = SecureBytes::new(vec![1, 2, 3, 4]);
        assert_eq!(secure.len(), 4);
        assert_eq!(&*secure, &[1, 2, 3, 4]);
    }

    #[test]
    fn test_locked_buffer_reads_back() {
        let secure = SecureBytes::locked(vec![0xAB; 32]);
        assert_eq!(&*secure, &[0xAB; 32]);
    }

    #[test]
    fn test_debug_is_redacted() {
        let secure = SecureBytes::new(b"hunter2".to_vec());
        let printed = format!("{:?}", secure);
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains("hunter2"));
    }
}
