use crate::formats::{CaptionTrack, PendingUpload};
use crate::resolve::{PathResolver, replace_ext};

const CAPTION_EXT: &str = ".vtt";

/// Languages placed first, in this order, whenever they are available.
// TODO: decide an order for additional locales instead of keeping storage order.
pub const PRIORITY_LANGS: [&str; 3] = ["zh-CN", "zh-TW", "en"];

const FALLBACK_LABEL: &str = "English";

const LANGUAGE_LABELS: &[(&str, &str)] = &[
    ("af", "Afrikaans"),
    ("ar", "Arabic"),
    ("ar-dz", "Algerian Arabic"),
    ("ast", "Asturian"),
    ("az", "Azerbaijani"),
    ("be", "Belarusian"),
    ("bg", "Bulgarian"),
    ("bn", "Bengali"),
    ("br", "Breton"),
    ("bs", "Bosnian"),
    ("ca", "Catalan"),
    ("ckb", "Central Kurdish (Sorani)"),
    ("cs", "Czech"),
    ("cy", "Welsh"),
    ("da", "Danish"),
    ("de", "German"),
    ("dsb", "Lower Sorbian"),
    ("el", "Greek"),
    ("en", "English"),
    ("en-au", "Australian English"),
    ("en-gb", "British English"),
    ("eo", "Esperanto"),
    ("es", "Spanish"),
    ("es-ar", "Argentinian Spanish"),
    ("es-co", "Colombian Spanish"),
    ("es-mx", "Mexican Spanish"),
    ("es-ni", "Nicaraguan Spanish"),
    ("es-ve", "Venezuelan Spanish"),
    ("et", "Estonian"),
    ("eu", "Basque"),
    ("fa", "Persian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("fy", "Frisian"),
    ("ga", "Irish"),
    ("gd", "Scottish Gaelic"),
    ("gl", "Galician"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hr", "Croatian"),
    ("hsb", "Upper Sorbian"),
    ("hu", "Hungarian"),
    ("hy", "Armenian"),
    ("ia", "Interlingua"),
    ("id", "Indonesian"),
    ("ig", "Igbo"),
    ("io", "Ido"),
    ("is", "Icelandic"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ka", "Georgian"),
    ("kab", "Kabyle"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("kn", "Kannada"),
    ("ko", "Korean"),
    ("ky", "Kyrgyz"),
    ("lb", "Luxembourgish"),
    ("lt", "Lithuanian"),
    ("lv", "Latvian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mn", "Mongolian"),
    ("mr", "Marathi"),
    ("ms", "Malay"),
    ("my", "Burmese"),
    ("nb", "Norwegian Bokmål"),
    ("ne", "Nepali"),
    ("nl", "Dutch"),
    ("nn", "Norwegian Nynorsk"),
    ("os", "Ossetic"),
    ("pa", "Punjabi"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("pt-br", "Brazilian Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("sq", "Albanian"),
    ("sr", "Serbian"),
    ("sr-latn", "Serbian Latin"),
    ("sv", "Swedish"),
    ("sw", "Swahili"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("tg", "Tajik"),
    ("th", "Thai"),
    ("tk", "Turkmen"),
    ("tr", "Turkish"),
    ("tt", "Tatar"),
    ("udm", "Udmurt"),
    ("uk", "Ukrainian"),
    ("ur", "Urdu"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("zh-hans", "Simplified Chinese"),
    ("zh-hant", "Traditional Chinese"),
];

/// Human-readable label for a caption language code.
pub fn language_label(lang: &str) -> &'static str {
    let key = match lang {
        "zh-CN" => "zh-hans".to_owned(),
        "zh-TW" => "zh-hant".to_owned(),
        other => other.to_lowercase(),
    };
    LANGUAGE_LABELS
        .iter()
        .find(|(code, _)| *code == key)
        .map_or(FALLBACK_LABEL, |(_, label)| label)
}

/// Language codes found in a stored caption list, in storage order.
pub fn stored_languages(raw: &str) -> Vec<String> {
    let mut langs: Vec<String> = Vec::new();
    for entry in raw.split(',').map(str::trim) {
        let Some(stem) = entry.strip_suffix(CAPTION_EXT) else {
            continue;
        };
        let lang = stem.rsplit(['.', '/', '\\']).next().unwrap_or(stem);
        if lang.is_empty() || langs.iter().any(|seen| seen == lang) {
            continue;
        }
        langs.push(lang.to_owned());
    }
    langs
}

/// Orders stored languages: priority languages first, the rest in storage order.
pub fn ordered_languages(raw: &str) -> Vec<String> {
    let stored = stored_languages(raw);
    let mut ordered: Vec<String> = PRIORITY_LANGS
        .iter()
        .filter(|lang| stored.iter().any(|stored| stored == *lang))
        .map(|lang| (*lang).to_owned())
        .collect();
    for lang in stored {
        if !ordered.contains(&lang) {
            ordered.push(lang);
        }
    }
    ordered
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTracks {
    pub tracks: Vec<CaptionTrack>,
    pub uploads: Vec<PendingUpload>,
}

/// Builds caption tracks for a video.
///
/// Caption files of the priority languages are queued for upload next to the
/// video; other languages are referenced but not uploaded.
pub fn build_tracks(
    raw: &str,
    video_url: &str,
    video_saved_path: &str,
    resolver: &PathResolver,
) -> anyhow::Result<SubtitleTracks> {
    let mut result = SubtitleTracks::default();

    for (idx, lang) in ordered_languages(raw).into_iter().enumerate() {
        let caption_ext = format!(".{lang}{CAPTION_EXT}");
        if PRIORITY_LANGS.contains(&lang.as_str())
            && let Some(upload) =
                resolver.pending_upload(&replace_ext(video_saved_path, &caption_ext))?
        {
            result.uploads.push(upload);
        }

        result.tracks.push(CaptionTrack {
            url: replace_ext(video_url, &caption_ext),
            label: language_label(&lang).to_owned(),
            lang,
            is_default: idx == 0,
        });
    }

    Ok(result)
}
