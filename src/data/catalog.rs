//! Item Catalog Module
//! Fixed classification rules and code tables for the ICO and BDGD extracts.

use std::fmt;

/// Thematic group of a cost line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemGroup {
    Consumidores,
    Potencia,
    Transformadores,
    Rede,
    Outros,
}

/// Marker substrings in priority order. First match wins.
const GROUP_MARKERS: [(&str, ItemGroup); 4] = [
    ("CONSUMIDOR", ItemGroup::Consumidores),
    ("POTÊNCIA", ItemGroup::Potencia),
    ("TRANSFORMADOR", ItemGroup::Transformadores),
    ("REDE", ItemGroup::Rede),
];

impl ItemGroup {
    pub fn label(self) -> &'static str {
        match self {
            ItemGroup::Consumidores => "Consumidores",
            ItemGroup::Potencia => "Potência",
            ItemGroup::Transformadores => "Transformadores",
            ItemGroup::Rede => "Rede",
            ItemGroup::Outros => "Outros",
        }
    }
}

impl fmt::Display for ItemGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a free-text cost item into its thematic group.
///
/// Matching is case-insensitive and checks the markers in fixed order, so an
/// item mentioning both "TRANSFORMADOR" and "REDE" lands in `Transformadores`.
pub fn categorize_item(item: &str) -> ItemGroup {
    let upper = item.to_uppercase();
    GROUP_MARKERS
        .iter()
        .find(|(marker, _)| upper.contains(marker))
        .map(|&(_, group)| group)
        .unwrap_or(ItemGroup::Outros)
}

/// Distributor site code -> company abbreviation.
static COMPANIES: [(i64, &str); 9] = [
    (26, "EAC"),
    (6600, "EPB"),
    (405, "EMT"),
    (404, "EMS"),
    (5216, "ESS"),
    (6587, "ESE"),
    (369, "ERO"),
    (6585, "EMR"),
    (32, "ETO"),
];

/// TUC equipment code -> description.
static EQUIPMENT: [(i64, &str); 14] = [
    (125, "BANCO DE CAPACITORES"),
    (135, "BARRAMENTO"),
    (160, "CHAVE"),
    (210, "DISJUNTOR"),
    (255, "ESTRUTURA (POSTE, TORRE)"),
    (295, "MEDIDOR"),
    (330, "REATOR"),
    (340, "REGULADOR"),
    (345, "RELIGADOR"),
    (540, "SUBESTAÇÃO SF 6"),
    (545, "SUBESTAÇÃO UNITÁRIA"),
    (565, "TRANSFORMADOR DE DISTRIBUIÇÃO"),
    (570, "TRANSFORMADOR DE FORÇA"),
    (575, "TRANSFORMADOR DE MEDIDA"),
];

/// Look up the company abbreviation for a distributor site code.
pub fn company_label(code: i64) -> Option<&'static str> {
    COMPANIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, label)| label)
}

/// Look up the description of a TUC equipment code.
pub fn equipment_description(code: i64) -> Option<&'static str> {
    EQUIPMENT
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, desc)| desc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_examples() {
        assert_eq!(categorize_item("CONSUMIDOR RESIDENCIAL"), ItemGroup::Consumidores);
        assert_eq!(categorize_item("REDE AEREA"), ItemGroup::Rede);
        assert_eq!(categorize_item("ILUMINACAO PUBLICA"), ItemGroup::Outros);
        assert_eq!(categorize_item(""), ItemGroup::Outros);
    }

    #[test]
    fn test_categorize_is_case_insensitive() {
        assert_eq!(categorize_item("demanda de potência"), ItemGroup::Potencia);
        assert_eq!(categorize_item("Transformador 75kVA"), ItemGroup::Transformadores);
    }

    #[test]
    fn test_categorize_priority() {
        assert_eq!(
            categorize_item("REDE DE TRANSFORMADOR"),
            ItemGroup::Transformadores
        );
        assert_eq!(
            categorize_item("TRANSFORMADOR DE POTÊNCIA NA REDE"),
            ItemGroup::Potencia
        );
        assert_eq!(
            categorize_item("POTÊNCIA POR CONSUMIDOR"),
            ItemGroup::Consumidores
        );
    }

    #[test]
    fn test_group_labels() {
        assert_eq!(ItemGroup::Potencia.to_string(), "Potência");
        assert_eq!(ItemGroup::Outros.label(), "Outros");
    }

    #[test]
    fn test_company_lookup() {
        assert_eq!(company_label(404), Some("EMS"));
        assert_eq!(company_label(6600), Some("EPB"));
        assert_eq!(company_label(1), None);
    }

    #[test]
    fn test_equipment_lookup() {
        assert_eq!(
            equipment_description(565),
            Some("TRANSFORMADOR DE DISTRIBUIÇÃO")
        );
        assert_eq!(equipment_description(0), None);
        assert_eq!(equipment_description(999), None);
    }
}
