//! CAN 接口状态检查
//!
//! 通过 `if_nametoindex()` 判断接口是否存在，通过 `ioctl(SIOCGIFFLAGS)` 读取 IFF_UP 标志位。
//! 只读操作，普通用户即可执行。

use crate::{CanDeviceError, CanDeviceErrorKind, CanError};
use libc::{AF_INET, IFF_UP, SIOCGIFFLAGS, SOCK_DGRAM, if_nametoindex, ifreq};
use std::ffi::CString;
use std::io;
use tracing::trace;

/// IFNAMSIZ - 1（ifr_name 包括结尾的 NUL）
const MAX_IFACE_NAME_LEN: usize = 15;

/// 校验接口名
fn validate_interface_name(interface: &str) -> Result<CString, CanError> {
    if interface.is_empty() || interface.len() > MAX_IFACE_NAME_LEN {
        return Err(CanDeviceError::new(
            CanDeviceErrorKind::InvalidName,
            format!(
                "Interface name '{}' must be 1..={} characters",
                interface, MAX_IFACE_NAME_LEN
            ),
        )
        .into());
    }

    CString::new(interface).map_err(|e| {
        CanDeviceError::new(
            CanDeviceErrorKind::InvalidName,
            format!("Invalid interface name: {}", e),
        )
        .into()
    })
}

/// 检查 CAN 接口是否存在且已启动
///
/// # 返回值
/// - `Ok(true)`: 接口存在且为 UP
/// - `Ok(false)`: 接口存在但为 DOWN
/// - `Err(CanError::Device)`: 接口名无效或接口不存在
/// - `Err(CanError::Io)`: socket/ioctl 调用失败
pub fn check_interface_status(interface: &str) -> Result<bool, CanError> {
    let c_iface = validate_interface_name(interface)?;

    let ifindex = unsafe { if_nametoindex(c_iface.as_ptr()) };
    if ifindex == 0 {
        return Err(CanDeviceError::new(
            CanDeviceErrorKind::NotFound,
            format!(
                "CAN interface '{}' does not exist ({}). Create it first, e.g.:\n  sudo ip link add dev {} type can",
                interface,
                io::Error::last_os_error(),
                interface
            ),
        )
        .into());
    }

    let mut ifr: ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in ifr.ifr_name.iter_mut().zip(c_iface.as_bytes_with_nul()) {
        *dst = *src as libc::c_char;
    }

    // 关闭 ioctl 用的临时 socket
    struct FdGuard(libc::c_int);
    impl Drop for FdGuard {
        fn drop(&mut self) {
            unsafe { libc::close(self.0) };
        }
    }

    let sockfd = unsafe { libc::socket(AF_INET, SOCK_DGRAM, 0) };
    if sockfd < 0 {
        return Err(CanError::Io(io::Error::last_os_error()));
    }
    let _guard = FdGuard(sockfd);

    let result = unsafe { libc::ioctl(sockfd, SIOCGIFFLAGS, &mut ifr as *mut ifreq) };
    if result < 0 {
        return Err(CanError::Io(io::Error::last_os_error()));
    }

    // ifru_flags 是 ifr_ifru union 的第一个字段（c_short）
    let flags = unsafe { *(std::ptr::addr_of!(ifr.ifr_ifru) as *const libc::c_short) };
    let is_up = (flags as libc::c_int & IFF_UP) != 0;

    trace!(
        "Interface '{}' status: {}",
        interface,
        if is_up { "UP" } else { "DOWN" }
    );
    Ok(is_up)
}
