//! Offline answer synthesizer
//!
//! Pure, deterministic last resort: when the Gemini API cannot be reached
//! the user still gets an on-topic answer built from the local Fishpedia
//! catalog. No I/O, no randomness, never empty output, no markup.
//!
//! Routing is first-match-wins: an entity match on a catalog record beats
//! the topic keyword rules, which beat the generic greeting.

use crate::models::FishSpecies;

struct TopicRule {
    keywords: &'static [&'static str],
    answer: &'static str,
}

/// Ordered rule table. Add or remove topics here; each branch is unit
/// tested independently.
const TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        keywords: &[
            "penyakit", "sakit", "gejala", "obat", "jamur", "white spot", "busuk", "kutu",
        ],
        answer: DISEASE_ANSWER,
    },
    TopicRule {
        keywords: &[
            "perawatan", "merawat", "cara", "tips", "panduan", "pelihara", "memelihara", "pakan",
        ],
        answer: CARE_ANSWER,
    },
    TopicRule {
        keywords: &[
            "air", "kualitas", "ph", "suhu", "amonia", "nitrit", "nitrat", "filter",
        ],
        answer: WATER_ANSWER,
    },
];

const DISEASE_ANSWER: &str = "Penyakit pada ikan hias umumnya disebabkan oleh kualitas air yang buruk, stres, atau infeksi dari ikan baru yang tidak dikarantina. Penyebab paling umum adalah penumpukan amonia dan nitrit, perubahan suhu mendadak, serta kepadatan akuarium yang berlebihan.\n\nGejala yang perlu diwaspadai antara lain ikan berenang tidak normal, nafsu makan menurun, sirip menguncup, muncul bintik putih atau bercak pada tubuh, serta ikan sering menggesekkan badan ke dekorasi. Semakin cepat gejala dikenali, semakin besar peluang kesembuhan.\n\nLangkah pertama pengobatan selalu dimulai dari air. Periksa suhu, pH, amonia, dan nitrit terlebih dahulu, lalu lakukan penggantian air sebagian. Pisahkan ikan yang sakit ke wadah karantina sebelum memberikan obat sesuai jenis penyakitnya, misalnya garam ikan untuk infeksi ringan atau obat anti jamur untuk bercak kapas.\n\nPencegahan jauh lebih mudah daripada pengobatan. Jaga kualitas air tetap stabil, jangan memberi pakan berlebihan, dan selalu karantina ikan baru selama satu hingga dua minggu sebelum digabungkan ke akuarium utama.";

const CARE_ANSWER: &str = "Perawatan ikan hias yang baik bertumpu pada rutinitas sederhana yang konsisten. Lakukan penggantian air sebanyak 20 sampai 30 persen setiap minggu menggunakan air yang sudah diendapkan, jangan mengganti seluruh air sekaligus karena akan menghilangkan bakteri baik.\n\nPantau parameter air secara berkala. Suhu dan pH yang stabil jauh lebih penting daripada angka yang sempurna, karena perubahan mendadak adalah sumber stres utama bagi ikan.\n\nBeri pakan secukupnya satu hingga dua kali sehari, sebanyak yang habis dimakan dalam dua sampai tiga menit. Sisa pakan yang membusuk adalah penyebab tersering rusaknya kualitas air.\n\nBersihkan filter sebulan sekali dengan air bekas akuarium, bukan air keran, agar koloni bakteri pengurai tetap hidup. Untuk kebutuhan spesifik setiap jenis ikan, silakan buka katalog Fishpedia di aplikasi TemanIkan.";

const WATER_ANSWER: &str = "Kualitas air adalah faktor terpenting dalam memelihara ikan hias. Untuk kebanyakan ikan tropis, pertahankan suhu di kisaran 24 sampai 28 derajat Celsius dan pH antara 6,5 sampai 7,5. Beberapa jenis ikan memiliki kebutuhan khusus yang bisa Anda lihat di Fishpedia.\n\nAmonia dan nitrit harus selalu nol. Keduanya sangat beracun bahkan dalam kadar rendah, dan kemunculannya menandakan siklus nitrogen akuarium belum matang atau filter tidak bekerja dengan baik. Nitrat lebih aman, namun usahakan tetap di bawah 40 ppm.\n\nJika parameter menyimpang, lakukan penggantian air sebagian sebesar 20 sampai 30 persen, periksa apakah ada sisa pakan atau ikan mati yang membusuk, dan pastikan filter berjalan normal. Ulangi pengecekan satu hari kemudian sampai parameter kembali stabil.";

/// Produce a deterministic answer for any question and any catalog
/// snapshot, including an empty one.
pub fn synthesize(question: &str, records: &[FishSpecies]) -> String {
    let q = question.to_lowercase();

    // Entity match first: the earliest record whose name appears in the
    // question wins outright, no scoring between candidates.
    for record in records {
        let name_hit = q.contains(&record.name.to_lowercase());
        let sci_hit = record
            .scientific_name
            .as_ref()
            .map(|s| !s.trim().is_empty() && q.contains(&s.to_lowercase()))
            .unwrap_or(false);
        if name_hit || sci_hit {
            return species_profile(record);
        }
    }

    for rule in TOPIC_RULES {
        if rule.keywords.iter().any(|kw| q.contains(kw)) {
            return rule.answer.to_string();
        }
    }

    default_answer(records)
}

fn species_profile(record: &FishSpecies) -> String {
    let mut out = String::new();

    match &record.scientific_name {
        Some(sci) if !sci.trim().is_empty() => {
            out.push_str(&format!("{} ({})", record.name, sci));
        }
        _ => out.push_str(&record.name),
    }

    if let Some(desc) = record.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str("\n\n");
        out.push_str(desc);
    }

    let mut attributes = Vec::new();
    if let Some(temp) = record.water_temp.as_deref().filter(|v| !v.trim().is_empty()) {
        attributes.push(format!("Suhu air ideal: {}", temp));
    }
    if let Some(ph) = record.ph_range.as_deref().filter(|v| !v.trim().is_empty()) {
        attributes.push(format!("Rentang pH: {}", ph));
    }
    if let Some(size) = record.max_size.as_deref().filter(|v| !v.trim().is_empty()) {
        attributes.push(format!("Ukuran maksimal: {}", size));
    }
    if let Some(diet) = record.diet.as_deref().filter(|v| !v.trim().is_empty()) {
        attributes.push(format!("Makanan: {}", diet));
    }

    if !attributes.is_empty() {
        out.push_str("\n\n");
        out.push_str(&attributes.join("\n"));
    }

    out
}

fn default_answer(records: &[FishSpecies]) -> String {
    let mut out = String::from(
        "Halo! Saya siap membantu Anda dengan pertanyaan seputar ikan hias, \
         perawatan akuarium, dan penyakit ikan.",
    );

    let names: Vec<&str> = records.iter().take(5).map(|r| r.name.as_str()).collect();
    if !names.is_empty() {
        out.push_str(&format!(
            " Beberapa jenis ikan yang tersedia di Fishpedia kami: {}.",
            names.join(", ")
        ));
    }

    out.push_str(
        "\n\nAnda dapat menanyakan profil jenis ikan tertentu, cara perawatan, \
         kualitas air, atau gejala penyakit. Jelajahi juga katalog Fishpedia, \
         fitur deteksi penyakit, dan forum komunitas di aplikasi TemanIkan.",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn koi() -> FishSpecies {
        let mut f = FishSpecies::named("Ikan Koi");
        f.scientific_name = Some("Cyprinus rubrofuscus".to_string());
        f.description = Some("Ikan hias populer dari Jepang.".to_string());
        f.water_temp = Some("18-25 C".to_string());
        f.ph_range = Some("6.8-7.5".to_string());
        f
    }

    #[test]
    fn entity_match_beats_topic_rules() {
        let records = vec![koi()];
        let answer = synthesize("apa itu ikan koi", &records);
        assert!(answer.contains("Ikan Koi"));
        assert!(answer.contains("Cyprinus rubrofuscus"));
        assert!(!answer.contains("Halo! Saya siap membantu"));
    }

    #[test]
    fn entity_match_takes_first_record_in_order() {
        let mut guppy = FishSpecies::named("Guppy");
        guppy.description = Some("Ikan kecil yang mudah dipelihara.".to_string());
        let records = vec![koi(), guppy];
        let answer = synthesize("lebih bagus ikan koi atau guppy?", &records);
        assert!(answer.contains("Ikan Koi"));
        assert!(!answer.contains("mudah dipelihara"));
    }

    #[test]
    fn scientific_name_also_matches() {
        let records = vec![koi()];
        let answer = synthesize("info tentang cyprinus rubrofuscus", &records);
        assert!(answer.contains("Ikan Koi"));
    }

    #[test]
    fn disease_keyword_routes_to_disease_branch() {
        let answer = synthesize("ikan saya kena penyakit apa ya", &[]);
        assert!(answer.contains("karantina"));
        assert!(answer.contains("Gejala"));
    }

    #[test]
    fn care_keyword_routes_to_care_branch() {
        let answer = synthesize("ada tips untuk pemula?", &[]);
        assert!(answer.contains("penggantian air"));
        assert!(answer.contains("Fishpedia"));
        assert_ne!(answer, synthesize("ikan saya sakit", &[]));
    }

    #[test]
    fn water_keyword_routes_to_water_branch() {
        let answer = synthesize("berapa ph yang bagus?", &[]);
        assert!(answer.contains("Amonia dan nitrit harus selalu nol"));
        assert!(answer.contains("40 ppm"));
    }

    #[test]
    fn default_lists_up_to_five_names_in_order() {
        let records: Vec<FishSpecies> = ["Koi", "Cupang", "Guppy", "Arwana", "Discus", "Molly"]
            .iter()
            .map(|n| FishSpecies::named(n))
            .collect();
        let answer = synthesize("halo", &records);
        assert!(answer.contains("Koi, Cupang, Guppy, Arwana, Discus"));
        assert!(!answer.contains("Molly"));
    }

    #[test]
    fn total_on_empty_records_and_never_empty() {
        let answer = synthesize("halo", &[]);
        assert!(!answer.is_empty());
        assert!(answer.contains("Halo! Saya siap membantu"));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let records = vec![koi()];
        let a = synthesize("bagaimana kualitas air yang baik", &records);
        let b = synthesize("bagaimana kualitas air yang baik", &records);
        assert_eq!(a, b);
    }

    #[test]
    fn output_contains_no_markup() {
        let records = vec![koi()];
        for q in ["apa itu ikan koi", "penyakit", "tips", "ph", "halo"] {
            let answer = synthesize(q, &records);
            assert!(!answer.contains('*'), "markup in answer for {:?}", q);
            assert!(!answer.contains('#'), "markup in answer for {:?}", q);
            assert!(!answer.contains("• "), "bullet in answer for {:?}", q);
        }
    }
}
