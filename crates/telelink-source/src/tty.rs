//! Device-node handling for serial links.
//!
//! A serial port left in the terminal's default canonical mode rewrites
//! CR to NL, treats ^D as end of input and holds bytes until a newline,
//! which corrupts binary frames. [`configure_raw`] switches a terminal to
//! raw 8N1 at a fixed baud rate; other files are left alone.

use std::fs::File;
use std::io;
use std::path::Path;

/// Line speed used when none is configured.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Baud rates [`configure_raw`] accepts.
pub const SUPPORTED_BAUD_RATES: &[u32] = &[9_600, 19_200, 38_400, 57_600, 115_200, 230_400];

/// Open a device node or file for reading without making it the
/// controlling terminal.
#[cfg(unix)]
pub fn open_device(path: &Path) -> io::Result<File> {
    use std::fs::OpenOptions;
    use std::os::fd::AsRawFd;
    use std::os::unix::fs::OpenOptionsExt;

    // O_NONBLOCK keeps the open from waiting on carrier detect.
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
        .open(path)?;
    let fd = file.as_raw_fd();

    // SAFETY: `fd` is an open descriptor owned by `file`.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above; only the status flags are changed.
    check(unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) })?;
    Ok(file)
}

#[cfg(not(unix))]
pub fn open_device(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Put `file` into raw 8N1 mode at `baud` if it is a terminal.
///
/// Returns `Ok(false)` without touching the file when it is not a terminal
/// (capture files, pipes). Unsupported rates fail with
/// [`io::ErrorKind::InvalidInput`].
#[cfg(unix)]
pub fn configure_raw(file: &File, baud: u32) -> io::Result<bool> {
    use std::os::fd::AsRawFd;

    let fd = file.as_raw_fd();
    // SAFETY: `fd` is an open descriptor owned by `file`.
    if unsafe { libc::isatty(fd) } != 1 {
        return Ok(false);
    }
    let speed = speed_for(baud).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported baud rate {baud}"),
        )
    })?;

    // SAFETY: termios is plain old data; tcgetattr overwrites it below.
    let mut tio: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: `fd` is a terminal and `tio` is a valid, writable termios.
    check(unsafe { libc::tcgetattr(fd, &mut tio) })?;

    // SAFETY: `tio` was filled in by tcgetattr.
    unsafe {
        libc::cfmakeraw(&mut tio);
        check(libc::cfsetispeed(&mut tio, speed))?;
        check(libc::cfsetospeed(&mut tio, speed))?;
    }
    tio.c_cflag |= libc::CLOCAL | libc::CREAD;
    tio.c_cc[libc::VMIN] = 1;
    tio.c_cc[libc::VTIME] = 0;

    // SAFETY: `fd` is a terminal and `tio` is fully initialised.
    check(unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) })?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn configure_raw(_file: &File, _baud: u32) -> io::Result<bool> {
    Ok(false)
}

#[cfg(unix)]
fn speed_for(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

#[cfg(unix)]
fn check(rc: libc::c_int) -> io::Result<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    #[cfg(target_os = "linux")]
    use std::path::PathBuf;

    use super::*;

    /// Allocate a pseudo-terminal; returns the master side and the slave path.
    #[cfg(target_os = "linux")]
    pub(crate) fn open_pty() -> (File, PathBuf) {
        use std::ffi::CStr;
        use std::os::fd::FromRawFd;

        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "posix_openpt: {}", io::Error::last_os_error());
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);

            let mut name = [0 as libc::c_char; 128];
            assert_eq!(libc::ptsname_r(master, name.as_mut_ptr(), name.len()), 0);
            let slave = CStr::from_ptr(name.as_ptr()).to_string_lossy().into_owned();
            (File::from_raw_fd(master), PathBuf::from(slave))
        }
    }

    #[test]
    fn every_listed_rate_is_supported() {
        #[cfg(unix)]
        for baud in SUPPORTED_BAUD_RATES {
            assert!(speed_for(*baud).is_some(), "{baud}");
        }
        assert!(SUPPORTED_BAUD_RATES.contains(&DEFAULT_BAUD_RATE));
    }

    #[test]
    fn regular_file_is_left_alone() {
        let dir = std::env::temp_dir().join(format!("telelink-tty-file-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("capture.bin");
        std::fs::write(&path, b"\r\n\x04").unwrap();

        let file = open_device(&path).unwrap();
        assert!(!configure_raw(&file, DEFAULT_BAUD_RATE).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn terminal_is_switched_to_raw_mode() {
        use std::os::fd::AsRawFd;

        let (_master, slave) = open_pty();
        let file = open_device(&slave).unwrap();
        assert!(configure_raw(&file, DEFAULT_BAUD_RATE).unwrap());

        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        assert_eq!(unsafe { libc::tcgetattr(file.as_raw_fd(), &mut tio) }, 0);
        assert_eq!(tio.c_lflag & (libc::ICANON | libc::ECHO | libc::ISIG), 0);
        assert_eq!(tio.c_iflag & (libc::ICRNL | libc::IXON), 0);
        assert_eq!(tio.c_cflag & libc::CSIZE, libc::CS8);
        assert_eq!(unsafe { libc::cfgetispeed(&tio) }, libc::B115200);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unsupported_rate_is_rejected_on_terminal() {
        let (_master, slave) = open_pty();
        let file = open_device(&slave).unwrap();
        let err = configure_raw(&file, 12_345).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
