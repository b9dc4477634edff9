//! Bsdf Capabilities

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Describes which kinds of scattering a Bsdf, a lobe or a shader
    /// supports. The low nibble holds the mode (emission, reflection,
    /// transmission); the high nibble the lobe kind (diffuse, specular,
    /// glossy). Also used as the `allowed_caps` filter of every evaluation.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BsdfCaps: u8 {
        const NONE = 0x00;
        const EMISSION = 0x01;
        const REFLECTION = 0x02;
        const TRANSMISSION = 0x04;
        const DIFFUSE = 0x10;
        const SPECULAR = 0x20;
        const GLOSSY = 0x40;
        const ALL = 0xff;

        const NON_DIFFUSE = Self::GLOSSY.bits() | Self::SPECULAR.bits();
        const ALL_REFLECTION = Self::REFLECTION.bits() | Self::DIFFUSE.bits() | Self::NON_DIFFUSE.bits();
        const ALL_TRANSMISSION = Self::TRANSMISSION.bits() | Self::DIFFUSE.bits() | Self::NON_DIFFUSE.bits();
        const ALL_DIFFUSE = Self::REFLECTION.bits() | Self::TRANSMISSION.bits() | Self::DIFFUSE.bits();
        const ALL_SPECULAR = Self::REFLECTION.bits() | Self::TRANSMISSION.bits() | Self::SPECULAR.bits();
        const ALL_GLOSSY = Self::REFLECTION.bits() | Self::TRANSMISSION.bits() | Self::GLOSSY.bits();
        const ALL_NON_DIFFUSE = Self::REFLECTION.bits() | Self::TRANSMISSION.bits() | Self::NON_DIFFUSE.bits();
    }
}

/// Bits of the scattering mode.
const MODE_MASK: u8 = 0x0f;

/// Bits of the lobe kind.
const KIND_MASK: u8 = 0xf0;

/// Returns true if all bits of `wanted` are present in `caps`.
///
/// * `caps`   - The capabilities to test.
/// * `wanted` - The required capabilities.
#[inline]
pub fn has_caps(caps: BsdfCaps, wanted: BsdfCaps) -> bool {
    caps & wanted == wanted
}

/// Returns true if `caps` and `allowed` share at least one mode bit and at
/// least one lobe-kind bit.
///
/// * `caps`    - The capabilities of a lobe or Bsdf.
/// * `allowed` - The capabilities the caller accepts.
#[inline]
pub fn compatible_caps(caps: BsdfCaps, allowed: BsdfCaps) -> bool {
    let common = (caps & allowed).bits();
    common & MODE_MASK != 0 && common & KIND_MASK != 0
}

impl BsdfCaps {
    /// Returns true if all bits of `wanted` are present.
    ///
    /// * `wanted` - The required capabilities.
    pub fn has(&self, wanted: BsdfCaps) -> bool {
        has_caps(*self, wanted)
    }

    /// Returns true if compatible with the allowed capabilities.
    ///
    /// * `allowed` - The capabilities the caller accepts.
    pub fn compatible(&self, allowed: BsdfCaps) -> bool {
        compatible_caps(*self, allowed)
    }

    /// Returns the capabilities with reflection and transmission swapped.
    pub fn flipped(&self) -> BsdfCaps {
        let mut caps = *self - (BsdfCaps::REFLECTION | BsdfCaps::TRANSMISSION);
        if self.contains(BsdfCaps::REFLECTION) {
            caps |= BsdfCaps::TRANSMISSION;
        }
        if self.contains(BsdfCaps::TRANSMISSION) {
            caps |= BsdfCaps::REFLECTION;
        }
        caps
    }
}

impl fmt::Display for BsdfCaps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(BsdfCaps, &str); 6] = [
            (BsdfCaps::EMISSION, "EMISSION"),
            (BsdfCaps::REFLECTION, "REFLECTION"),
            (BsdfCaps::TRANSMISSION, "TRANSMISSION"),
            (BsdfCaps::DIFFUSE, "DIFFUSE"),
            (BsdfCaps::SPECULAR, "SPECULAR"),
            (BsdfCaps::GLOSSY, "GLOSSY"),
        ];
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(c, _)| self.contains(*c))
            .map(|(_, n)| *n)
            .collect();
        if names.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", names.join("|"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derived_unions() {
        assert_eq!(
            BsdfCaps::ALL_GLOSSY,
            BsdfCaps::REFLECTION | BsdfCaps::TRANSMISSION | BsdfCaps::GLOSSY
        );
        assert_eq!(BsdfCaps::NON_DIFFUSE, BsdfCaps::GLOSSY | BsdfCaps::SPECULAR);
        assert!(BsdfCaps::ALL.contains(BsdfCaps::ALL_NON_DIFFUSE | BsdfCaps::ALL_DIFFUSE));
    }

    #[test]
    fn has_needs_every_bit() {
        let caps = BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE;
        assert!(has_caps(caps, BsdfCaps::REFLECTION));
        assert!(has_caps(caps, BsdfCaps::NONE));
        assert!(!has_caps(caps, BsdfCaps::REFLECTION | BsdfCaps::GLOSSY));
    }

    #[test]
    fn compatible_needs_mode_and_kind() {
        let lambert = BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE;
        assert!(compatible_caps(lambert, BsdfCaps::ALL));
        assert!(compatible_caps(lambert, BsdfCaps::ALL_DIFFUSE));
        assert!(!compatible_caps(lambert, BsdfCaps::ALL_SPECULAR));
        assert!(!compatible_caps(lambert, BsdfCaps::ALL_TRANSMISSION));
        assert!(!compatible_caps(lambert, BsdfCaps::REFLECTION));
        assert!(!compatible_caps(lambert, BsdfCaps::DIFFUSE));
    }

    #[test]
    fn flip_swaps_modes() {
        let caps = BsdfCaps::REFLECTION | BsdfCaps::GLOSSY;
        assert_eq!(caps.flipped(), BsdfCaps::TRANSMISSION | BsdfCaps::GLOSSY);
        assert_eq!(BsdfCaps::ALL_SPECULAR.flipped(), BsdfCaps::ALL_SPECULAR);
    }

    #[test]
    fn display_joins_names() {
        assert_eq!(
            format!("{}", BsdfCaps::REFLECTION | BsdfCaps::DIFFUSE),
            "REFLECTION|DIFFUSE"
        );
        assert_eq!(format!("{}", BsdfCaps::NONE), "NONE");
    }

    proptest! {
        #[test]
        fn compatible_is_symmetric(a in 0u8..=255, b in 0u8..=255) {
            let (a, b) = (BsdfCaps::from_bits_truncate(a), BsdfCaps::from_bits_truncate(b));
            prop_assert_eq!(compatible_caps(a, b), compatible_caps(b, a));
        }

        #[test]
        fn compatible_implies_overlap(a in 0u8..=255, b in 0u8..=255) {
            let (a, b) = (BsdfCaps::from_bits_truncate(a), BsdfCaps::from_bits_truncate(b));
            if compatible_caps(a, b) {
                prop_assert!(a.intersects(b));
            }
        }
    }
}
