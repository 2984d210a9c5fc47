pub struct DefaultsConfig {
    pub width: usize,
    pub min_slots: usize,
    pub max_slots: usize,
    pub default_slots: usize,
    pub max_possible_score: f64,
    pub optimizer_url: String,
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 6,
            min_slots: 6,
            max_slots: 60,
            default_slots: 30,
            max_possible_score: 500.0,
            optimizer_url: "http://127.0.0.1:5000/optimize".to_string(),
            timeout_secs: 30,
        }
    }
}
