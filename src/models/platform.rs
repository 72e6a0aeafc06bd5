//! Platform attribute enumerations and file-name token matching
//!
//! Each attribute of a binary (operating system, architecture, image type,
//! JVM implementation, heap size) is a closed enumeration carrying the
//! tokens under which it historically appears in asset file names. Tokens
//! are matched case-insensitively, delimited by `-` or `_` on the left and
//! `_` on the right, e.g. `OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("cannot determine {attribute} of asset {file_name}")]
    Undetermined {
        attribute: &'static str,
        file_name: String,
    },
}

/// Attribute inference from asset file names.
///
/// An attribute matches when one of its tokens appears in the lower-cased
/// file name preceded by `-` or `_` and followed by `_`.
pub trait FileNameMatcher: Sized + Copy + 'static {
    /// Human-readable attribute name, used in error messages
    const ATTRIBUTE: &'static str;

    fn variants() -> &'static [Self];

    /// File-name tokens under which this variant appears, all lower-case
    fn file_name_tokens(&self) -> &'static [&'static str];

    fn matches_file(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.file_name_tokens()
            .iter()
            .any(|token| lower.contains(&format!("-{token}_")) || lower.contains(&format!("_{token}_")))
    }
}

/// Resolves exactly one variant from a file name, or falls back to
/// `default` when zero or several variants match.
pub fn from_file_name<T: FileNameMatcher>(
    file_name: &str,
    default: Option<T>,
) -> Result<T, ClassificationError> {
    let matched: Vec<T> = T::variants()
        .iter()
        .copied()
        .filter(|variant| variant.matches_file(file_name))
        .collect();

    match (matched.as_slice(), default) {
        ([variant], _) => Ok(*variant),
        (_, Some(fallback)) => Ok(fallback),
        (_, None) => Err(ClassificationError::Undetermined {
            attribute: T::ATTRIBUTE,
            file_name: file_name.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingSystem {
    Linux,
    Windows,
    Mac,
    Solaris,
    Aix,
}

impl FileNameMatcher for OperatingSystem {
    const ATTRIBUTE: &'static str = "operating system";

    fn variants() -> &'static [Self] {
        &[Self::Linux, Self::Windows, Self::Mac, Self::Solaris, Self::Aix]
    }

    fn file_name_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Linux => &["linux"],
            Self::Windows => &["windows", "win"],
            Self::Mac => &["mac", "macos", "osx"],
            Self::Solaris => &["solaris"],
            Self::Aix => &["aix"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    X64,
    X32,
    Ppc64,
    Ppc64le,
    S390x,
    Aarch64,
    Arm,
    Sparcv9,
}

impl FileNameMatcher for Architecture {
    const ATTRIBUTE: &'static str = "architecture";

    fn variants() -> &'static [Self] {
        &[
            Self::X64,
            Self::X32,
            Self::Ppc64,
            Self::Ppc64le,
            Self::S390x,
            Self::Aarch64,
            Self::Arm,
            Self::Sparcv9,
        ]
    }

    fn file_name_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::X64 => &["x64"],
            Self::X32 => &["x32", "x86-32"],
            Self::Ppc64 => &["ppc64"],
            Self::Ppc64le => &["ppc64le"],
            Self::S390x => &["s390x"],
            Self::Aarch64 => &["aarch64"],
            Self::Arm => &["arm", "arm32"],
            Self::Sparcv9 => &["sparcv9"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jdk,
    Jre,
}

impl FileNameMatcher for ImageType {
    const ATTRIBUTE: &'static str = "image type";

    fn variants() -> &'static [Self] {
        &[Self::Jdk, Self::Jre]
    }

    fn file_name_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Jdk => &["jdk"],
            Self::Jre => &["jre"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JvmImpl {
    Hotspot,
    Openj9,
}

impl FileNameMatcher for JvmImpl {
    const ATTRIBUTE: &'static str = "jvm implementation";

    fn variants() -> &'static [Self] {
        &[Self::Hotspot, Self::Openj9]
    }

    fn file_name_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Hotspot => &["hotspot"],
            Self::Openj9 => &["openj9"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeapSize {
    Normal,
    Large,
}

impl FileNameMatcher for HeapSize {
    const ATTRIBUTE: &'static str = "heap size";

    fn variants() -> &'static [Self] {
        &[Self::Normal, Self::Large]
    }

    fn file_name_tokens(&self) -> &'static [&'static str] {
        match self {
            Self::Normal => &["normal"],
            // large-heap builds are published under platform-suffixed tokens
            Self::Large => &["large", "linuxxl", "macosxl", "windowsxl", "aixxl"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz", OperatingSystem::Linux)]
    #[case("OpenJDK8U-jre_x86-32_windows_hotspot_8u212b04.msi", OperatingSystem::Windows)]
    #[case("OpenJDK11U-jdk_x64_mac_hotspot_11.0.4_11.tar.gz", OperatingSystem::Mac)]
    #[case("OpenJDK8U-jdk_ppc64_aix_hotspot_8u222b10.tar.gz", OperatingSystem::Aix)]
    fn operating_system_is_inferred_from_file_name(
        #[case] file_name: &str,
        #[case] expected: OperatingSystem,
    ) {
        assert_eq!(from_file_name(file_name, None), Ok(expected));
    }

    #[rstest]
    #[case("OpenJDK8U-jdk_x64_linux_hotspot_8u222b10.tar.gz", Architecture::X64)]
    #[case("OpenJDK8U-jre_x86-32_windows_hotspot_8u212b04.msi", Architecture::X32)]
    #[case("OpenJDK11U-jdk_aarch64_linux_hotspot_11.0.4_11.tar.gz", Architecture::Aarch64)]
    #[case("OpenJDK8U-jdk_s390x_linux_openj9_8u222b10_openj9-0.15.1.tar.gz", Architecture::S390x)]
    fn architecture_is_inferred_from_file_name(
        #[case] file_name: &str,
        #[case] expected: Architecture,
    ) {
        assert_eq!(from_file_name(file_name, None), Ok(expected));
    }

    #[test]
    fn image_type_defaults_to_jdk_when_no_token_matches() {
        let result = from_file_name("OpenJDK8U_x64_linux_8u222b10.tar.gz", Some(ImageType::Jdk));
        assert_eq!(result, Ok(ImageType::Jdk));
    }

    #[test]
    fn jre_token_overrides_the_jdk_default() {
        let result = from_file_name(
            "OpenJDK8U-jre_x64_linux_hotspot_8u222b10.tar.gz",
            Some(ImageType::Jdk),
        );
        assert_eq!(result, Ok(ImageType::Jre));
    }

    #[test]
    fn large_heap_is_detected_from_platform_suffixed_token() {
        let result = from_file_name(
            "OpenJDK8-OPENJ9_x64_Linux_linuxXL_jdk8u222-b10.tar.gz",
            Some(HeapSize::Normal),
        );
        assert_eq!(result, Ok(HeapSize::Large));
    }

    #[test]
    fn unmatched_required_attribute_is_an_error() {
        let result: Result<OperatingSystem, _> = from_file_name("OpenJDK8U-jdk_x64_8u222b10.tar.gz", None);
        assert_eq!(
            result,
            Err(ClassificationError::Undetermined {
                attribute: "operating system",
                file_name: "OpenJDK8U-jdk_x64_8u222b10.tar.gz".to_string(),
            })
        );
    }

    #[test]
    fn token_must_be_delimited_to_match() {
        // "win" appears inside "windows" but never as a delimited token of its own
        assert!(!OperatingSystem::Linux.matches_file("OpenJDK8U-jdk_x64_winlin.tar.gz"));
        assert!(OperatingSystem::Windows.matches_file("OpenJDK8U-jdk_x64_windows_8u222b10.tar.gz"));
    }
}
