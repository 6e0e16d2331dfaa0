//! Architecture identifiers and their toolchain names.
//!
//! An architecture identifier has the form `<platform>-<cpu>`, for example
//! `android-armeabi-v7a` or `linux-x64`. Only Android identifiers map to
//! cross-compilation toolchains; the set of supported Android ABIs is closed
//! and an unknown one is an error rather than a guess.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

const ANDROID_PREFIX: &str = "android-";

/// Android ABIs this crate knows how to cross-compile for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AndroidAbi {
    X86,
    ArmeabiV7a,
}

impl AndroidAbi {
    /// Every supported ABI.
    pub fn all() -> &'static [AndroidAbi] {
        &[AndroidAbi::ArmeabiV7a, AndroidAbi::X86]
    }

    /// Parse a full architecture identifier such as `android-x86`.
    pub fn from_arch(arch: &str) -> Result<Self> {
        let cpu = arch
            .strip_prefix(ANDROID_PREFIX)
            .ok_or_else(|| Error::UnknownArch(arch.to_string()))?;
        cpu.parse().map_err(|_| Error::UnknownArch(arch.to_string()))
    }

    /// CPU suffix as used in `jniLibs/<abi>` folder names.
    pub fn cpu(&self) -> &'static str {
        match self {
            AndroidAbi::X86 => "x86",
            AndroidAbi::ArmeabiV7a => "armeabi-v7a",
        }
    }

    /// GNU host triple for `./configure --host=...`.
    pub fn configure_host(&self) -> &'static str {
        match self {
            AndroidAbi::X86 => "i686-linux-android",
            AndroidAbi::ArmeabiV7a => "arm-linux-androideabi",
        }
    }

    /// CPU family, as in the NDK's `platforms/arch-*` directories.
    pub fn android_arch(&self) -> &'static str {
        match self {
            AndroidAbi::X86 => "x86",
            AndroidAbi::ArmeabiV7a => "arm",
        }
    }

    /// Standalone toolchain name (compiler prefix and GCC version).
    pub fn toolchain(&self) -> &'static str {
        match self {
            AndroidAbi::X86 => "x86-4.9",
            AndroidAbi::ArmeabiV7a => "arm-linux-androideabi-4.9",
        }
    }
}

impl FromStr for AndroidAbi {
    type Err = Error;

    fn from_str(cpu: &str) -> Result<Self> {
        match cpu {
            "x86" => Ok(AndroidAbi::X86),
            "armeabi-v7a" => Ok(AndroidAbi::ArmeabiV7a),
            other => Err(Error::UnknownAbi(other.to_string())),
        }
    }
}

impl fmt::Display for AndroidAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cpu())
    }
}

/// Toolchain parameters for an Android ABI, as consumed by the NDK's setenv scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetenvInfo {
    pub android_arch: &'static str,
    pub toolchain: &'static str,
}

/// Given `platform-cpu`, returns `platform`.
///
/// An identifier without a hyphen is returned whole.
pub fn get_platform_from_arch(arch: &str) -> &str {
    arch.split_once('-').map_or(arch, |(platform, _)| platform)
}

pub fn arch_is_android(arch: &str) -> bool {
    arch.starts_with(ANDROID_PREFIX)
}

/// Host triple for `./configure --host=...`.
pub fn get_android_configure_host_type(arch: &str) -> Result<&'static str> {
    AndroidAbi::from_arch(arch).map(|abi| abi.configure_host())
}

/// Split off the CPU suffix and look up its CPU family and compiler prefix.
pub fn arch_to_setenv_info(arch: &str) -> Result<SetenvInfo> {
    let (_, cpu) = arch
        .split_once('-')
        .ok_or_else(|| Error::UnknownAbi(arch.to_string()))?;
    let abi: AndroidAbi = cpu.parse()?;
    Ok(SetenvInfo {
        android_arch: abi.android_arch(),
        toolchain: abi.toolchain(),
    })
}

/// CPU suffixes of the Android identifiers in `archs`, in order.
pub fn get_android_abis<S: AsRef<str>>(archs: &[S]) -> Vec<&str> {
    archs
        .iter()
        .map(|arch| arch.as_ref())
        .filter(|arch| arch_is_android(arch))
        .filter_map(|arch| arch.split_once('-').map(|(_, cpu)| cpu))
        .collect()
}

// TODO: MSVC targets name static libraries `<lib>.lib`; switch on the platform once a windows arch is added.
pub fn staticlib_name(_arch: &str, lib: &str) -> String {
    format!("lib{}.a", lib)
}
