//! Pre-submission validation and sanitization.

use crate::models::{DonorRecord, CAT_BLOOD_TYPES, DOG_BLOOD_TYPES};

const NUMERIC_FIELDS: [(&str, fn(&DonorRecord) -> &str); 8] = [
    ("age", |d| &d.age),
    ("weight", |d| &d.weight),
    ("pcv", |d| &d.pcv),
    ("hct", |d| &d.hct),
    ("wbc", |d| &d.wbc),
    ("plt", |d| &d.plt),
    ("packedCell", |d| &d.packed_cell),
    ("volume", |d| &d.volume),
];

/// Validate a donor before submission. Returns human-readable messages;
/// an empty vector means valid. Never mutates the record.
pub fn validate_donor(donor: &DonorRecord) -> Vec<String> {
    let mut errors = Vec::new();

    if donor.animal_name.trim().is_empty() {
        errors.push("Animal name is required".to_string());
    }
    if donor.animal_type.trim().is_empty() {
        errors.push("Animal type is required".to_string());
    }
    if donor.location.trim().is_empty() {
        errors.push("Location is required".to_string());
    }
    if donor.date.trim().is_empty() {
        errors.push("Date is required".to_string());
    } else if donor.parsed_date().is_none() {
        errors.push("Date must be in valid format".to_string());
    }

    for (name, get) in NUMERIC_FIELDS {
        let raw = get(donor).trim();
        if raw.is_empty() {
            continue;
        }
        match raw.parse::<f64>() {
            Ok(n) if n >= 0.0 => {}
            _ => errors.push(format!("{name} must be a positive number")),
        }
    }

    errors
}

/// Clear a blood type that is incompatible with the record's species.
/// Entering one of the co-constrained fields resets the other.
pub fn reset_incompatible_blood_type(donor: &mut DonorRecord) {
    let compatible: &[&str] = if donor.is_dog() {
        &DOG_BLOOD_TYPES
    } else if donor.is_cat() {
        &CAT_BLOOD_TYPES
    } else {
        return;
    };
    if !donor.blood_type.is_empty() && !compatible.contains(&donor.blood_type.as_str()) {
        donor.blood_type.clear();
    }
}

/// Sanitize free-text fields and canonicalize numeric strings. Strips
/// script fragments from text, trims whitespace, and reduces non-numeric
/// lab values to empty. Preserves the id.
pub fn sanitize_donor(donor: &DonorRecord) -> DonorRecord {
    let mut out = donor.clone();

    for field in [
        &mut out.animal_name,
        &mut out.owner_name,
        &mut out.owner_phone,
        &mut out.location,
        &mut out.animal_type,
        &mut out.blood_type,
        &mut out.gender,
        &mut out.fiv,
        &mut out.felv,
        &mut out.donated,
        &mut out.slide_findings,
        &mut out.notes,
    ] {
        *field = sanitize_text(field);
    }

    out.age = sanitize_numeric(&out.age);
    out.weight = sanitize_numeric(&out.weight);
    out.pcv = sanitize_numeric(&out.pcv);
    out.hct = sanitize_numeric(&out.hct);
    out.wbc = sanitize_numeric(&out.wbc);
    out.plt = sanitize_numeric(&out.plt);
    out.packed_cell = sanitize_numeric(&out.packed_cell);
    out.volume = sanitize_numeric(&out.volume);

    if donor.parsed_date().is_none() {
        out.date.clear();
    }

    out
}

fn sanitize_text(raw: &str) -> String {
    let mut text = raw.to_string();
    // Case-insensitive removal of script fragments.
    for needle in ["<script", "</script>", "javascript:"] {
        loop {
            let lower = text.to_lowercase();
            let Some(pos) = lower.find(needle) else { break };
            text.replace_range(pos..pos + needle.len(), "");
        }
    }
    text.trim().to_string()
}

fn sanitize_numeric(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(n) => {
            // Canonical form drops a trailing ".0" the way the form did.
            if n.fract() == 0.0 {
                format!("{}", n as i64)
            } else {
                n.to_string()
            }
        }
        Err(_) => String::new(),
    }
}
