//! Transliteration of display names into URL-safe slugs.

/// Latin spelling of one lowercase Cyrillic letter. Letters with no direct
/// Latin sound (ъ, ь) map to an empty string and disappear from the slug.
fn cyrillic_to_latin(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(mapped)
}

/// Builds a URL slug from arbitrary text. Lowercases the input, spells
/// Cyrillic letters out in Latin, keeps `[a-z0-9-]` as-is and turns every
/// other character into a single hyphen. Consecutive hyphens are not
/// collapsed and edges are not trimmed, matching the slugs already
/// published on the site.
pub fn transliterate(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        if let Some(mapped) = cyrillic_to_latin(ch) {
            slug.push_str(mapped);
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        } else {
            slug.push('-');
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyrillic_phrase() {
        assert_eq!(transliterate("Привет, мир!"), "privet--mir-");
    }

    #[test]
    fn test_deterministic() {
        let input = "Новый Кейс: SEO 2024";
        assert_eq!(transliterate(input), transliterate(input));
    }

    #[test]
    fn test_output_charset() {
        let slug = transliterate("Обзор инструментов — часть 1 (черновик)");
        assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_multi_letter_mappings() {
        assert_eq!(transliterate("ёжик"), "yozhik");
        assert_eq!(transliterate("щука"), "schuka");
        assert_eq!(transliterate("цюрих"), "tsyurih");
    }

    #[test]
    fn test_soft_and_hard_signs_deleted() {
        assert_eq!(transliterate("объём"), "obyom");
        assert_eq!(transliterate("львов"), "lvov");
    }

    #[test]
    fn test_latin_passes_through() {
        assert_eq!(transliterate("Hello World 42"), "hello-world-42");
    }

    #[test]
    fn test_hyphen_runs_preserved() {
        // Runs and edge hyphens are intentionally kept.
        assert_eq!(transliterate("a -- b"), "a----b");
        assert_eq!(transliterate("!news!"), "-news-");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(transliterate(""), "");
    }
}
