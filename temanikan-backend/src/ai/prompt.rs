//! Prompt assembly for the Gemini call
//!
//! Fixed Indonesian system instruction (prose only, no markup) plus a
//! bounded excerpt of the Fishpedia catalog so answers stay grounded in
//! local data, followed by the user's question.

use crate::models::FishSpecies;

/// Catalog lines included in the prompt. The snapshot handed to the
/// orchestrator is already bounded; this caps the prompt size as well.
const MAX_KNOWLEDGE_LINES: usize = 20;

const SYSTEM_INSTRUCTION: &str = "Anda adalah asisten AI ahli untuk perawatan ikan hias dan diagnosis penyakit ikan. Anda membantu pengguna dengan informasi tentang jenis ikan hias dan cara perawatannya, penyakit ikan dan pengobatannya, kualitas air akuarium, serta tips perawatan sehari-hari.\n\nAturan format jawaban yang wajib diikuti: jangan gunakan tanda asterisk, markdown, atau simbol formatting apapun. Jangan gunakan bullet point. Susun jawaban dalam paragraf yang jelas dengan baris kosong antar paragraf. Jika perlu daftar, gunakan nomor 1, 2, 3 di dalam kalimat. Gunakan bahasa Indonesia yang ramah, profesional, dan mudah dipahami.";

pub fn build_prompt(question: &str, records: &[FishSpecies]) -> String {
    let mut prompt = String::from(SYSTEM_INSTRUCTION);

    if !records.is_empty() {
        prompt.push_str("\n\nData ikan dari katalog Fishpedia kami:\n");
        for record in records.iter().take(MAX_KNOWLEDGE_LINES) {
            prompt.push_str(&knowledge_line(record));
            prompt.push('\n');
        }
    }

    prompt.push_str("\nPertanyaan pengguna: ");
    prompt.push_str(question);
    prompt
}

fn knowledge_line(record: &FishSpecies) -> String {
    let mut line = record.name.clone();
    if let Some(sci) = record.scientific_name.as_deref().filter(|s| !s.trim().is_empty()) {
        line.push_str(&format!(" ({})", sci));
    }

    let mut details = Vec::new();
    if let Some(temp) = record.water_temp.as_deref() {
        details.push(format!("suhu {}", temp));
    }
    if let Some(ph) = record.ph_range.as_deref() {
        details.push(format!("pH {}", ph));
    }
    if let Some(size) = record.max_size.as_deref() {
        details.push(format!("ukuran {}", size));
    }
    if let Some(diet) = record.diet.as_deref() {
        details.push(format!("pakan {}", diet));
    }

    if !details.is_empty() {
        line.push_str(": ");
        line.push_str(&details.join(", "));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_instruction_knowledge_and_question() {
        let mut koi = FishSpecies::named("Koi");
        koi.water_temp = Some("18-25 C".to_string());

        let prompt = build_prompt("apa makanan koi?", &[koi]);
        assert!(prompt.starts_with("Anda adalah asisten AI"));
        assert!(prompt.contains("Koi: suhu 18-25 C"));
        assert!(prompt.ends_with("Pertanyaan pengguna: apa makanan koi?"));
    }

    #[test]
    fn knowledge_section_omitted_when_catalog_empty() {
        let prompt = build_prompt("halo", &[]);
        assert!(!prompt.contains("katalog Fishpedia"));
    }

    #[test]
    fn knowledge_lines_are_bounded() {
        let records: Vec<FishSpecies> = (0..50)
            .map(|i| FishSpecies::named(&format!("Ikan{}", i)))
            .collect();
        let prompt = build_prompt("halo", &records);
        assert!(prompt.contains("Ikan19"));
        assert!(!prompt.contains("Ikan20\n"));
    }
}
