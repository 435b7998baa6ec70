//! Catálogo de ubicaciones
//!
//! Perfiles estáticos de cada sitio monitorizado: superficie, capacidad,
//! secciones y coordenada base. Se definen al arrancar y nunca cambian.

use super::density::Coordinates;

/// Sección con una fracción fija de la multitud de la ubicación padre.
/// Las fracciones no tienen por qué sumar 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionProfile {
    pub id: &'static str,
    pub name: &'static str,
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationProfile {
    pub name: &'static str,
    pub area_m2: f64,
    pub capacity: u64,
    pub sections: &'static [SectionProfile],
    pub base_point: Coordinates,
}

pub const MASJID_AL_HARAM: &str = "Masjid al-Haram";
pub const MINA: &str = "Mina";
pub const JAMARAAT_BRIDGE: &str = "Jamaraat Bridge";
pub const ARAFAT: &str = "Arafat";
pub const MUZDALIFAH: &str = "Muzdalifah";

const fn section(id: &'static str, name: &'static str, share: f64) -> SectionProfile {
    SectionProfile { id, name, share }
}

const fn point(lng: f64, lat: f64) -> Coordinates {
    Coordinates { lng, lat }
}

/// Orden fijo: el índice de cada entrada alimenta la variedad forzada del modelo.
pub static LOCATIONS: &[LocationProfile] = &[
    LocationProfile {
        name: MASJID_AL_HARAM,
        area_m2: 356_800.0,
        capacity: 1_500_000,
        sections: &[
            section("mataf", "Mataf Area", 0.15),
            section("ground", "Ground Floor", 0.45),
            section("first", "First Floor", 0.25),
            section("roof", "Roof Area", 0.15),
        ],
        base_point: point(39.826174, 21.422487),
    },
    LocationProfile {
        name: MINA,
        area_m2: 812_000.0,
        capacity: 1_200_000,
        sections: &[
            section("tents-a", "Tents Area A", 0.3),
            section("tents-b", "Tents Area B", 0.3),
            section("tents-c", "Tents Area C", 0.3),
            section("services", "Services Area", 0.1),
        ],
        base_point: point(39.892966, 21.413249),
    },
    LocationProfile {
        name: JAMARAAT_BRIDGE,
        area_m2: 52_000.0,
        // capacidad horaria
        capacity: 300_000,
        sections: &[
            section("lower", "Lower Level", 0.3),
            section("middle", "Middle Level", 0.4),
            section("upper", "Upper Level", 0.3),
        ],
        base_point: point(39.873485, 21.42365),
    },
    LocationProfile {
        name: ARAFAT,
        area_m2: 1_456_000.0,
        capacity: 2_500_000,
        sections: &[
            section("jabal", "Jabal al-Rahmah", 0.2),
            section("nimrah", "Nimrah", 0.3),
            section("uranah", "Uranah", 0.25),
            section("other", "Other Areas", 0.25),
        ],
        base_point: point(39.984687, 21.355461),
    },
    LocationProfile {
        name: MUZDALIFAH,
        area_m2: 623_000.0,
        capacity: 1_000_000,
        sections: &[
            section("mash", "Al-Mash'ar al-Haram", 0.3),
            section("north", "Northern Area", 0.35),
            section("south", "Southern Area", 0.35),
        ],
        base_point: point(39.936322, 21.383082),
    },
    LocationProfile {
        name: "Mina Entrance Gate 1",
        area_m2: 3_000.0,
        capacity: 20_000,
        sections: &[
            section("entry", "Entry Points", 0.4),
            section("security", "Security Check", 0.3),
            section("waiting", "Waiting Area", 0.3),
        ],
        base_point: point(39.887235, 21.411856),
    },
    LocationProfile {
        name: "Tent City Section A",
        area_m2: 120_000.0,
        capacity: 180_000,
        sections: &[
            section("a1", "Block A1", 0.25),
            section("a2", "Block A2", 0.25),
            section("a3", "Block A3", 0.25),
            section("a4", "Block A4", 0.25),
        ],
        base_point: point(39.889124, 21.414501),
    },
    LocationProfile {
        name: "Jamarat Central Access",
        area_m2: 8_000.0,
        capacity: 50_000,
        sections: &[
            section("entry", "Entry Zone", 0.4),
            section("corridor", "Main Corridor", 0.4),
            section("exit", "Exit Zone", 0.2),
        ],
        base_point: point(39.871952, 21.423850),
    },
];

pub fn find_location(name: &str) -> Option<&'static LocationProfile> {
    LOCATIONS.iter().find(|location| location.name == name)
}

/// Coordenada base de una ubicación; los nombres desconocidos caen en la mezquita.
pub fn base_coordinates(name: &str) -> Coordinates {
    find_location(name)
        .map(|location| location.base_point)
        .unwrap_or(LOCATIONS[0].base_point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_names_are_unique() {
        for (i, a) in LOCATIONS.iter().enumerate() {
            for b in &LOCATIONS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_unknown_location_uses_mosque_coordinates() {
        let coords = base_coordinates("Somewhere Else");
        assert_eq!(coords, LOCATIONS[0].base_point);
        assert_eq!(base_coordinates(ARAFAT), point(39.984687, 21.355461));
    }
}
