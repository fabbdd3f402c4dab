pub fn default_version() -> u32 {
    1
}

pub fn default_max_paragraphs() -> usize {
    3
}

pub fn default_min_satellites() -> usize {
    2
}

pub fn default_max_satellites() -> usize {
    5
}

pub fn default_paragraph_absolute_threshold() -> f64 {
    0.5
}

pub fn default_satellite_relative_threshold() -> f64 {
    0.5
}

pub fn default_satellite_absolute_threshold() -> f64 {
    0.2
}

pub fn default_nucleus_weight() -> f64 {
    1.0
}

pub fn default_second_paragraph_factor() -> f64 {
    0.0
}

pub fn default_later_paragraph_factor() -> f64 {
    0.3
}
