//! Image tag markup with height-tiered styling.

use crate::consts::{COMPACT_MAX_HEIGHT, MEDIUM_MAX_HEIGHT, PAGE_BREAK};

/// Build the markup replacing one rendered diagram image.
///
/// `images_left` counts this image and the remaining chunks of the same
/// block. When more than one is left the image belongs to a split diagram:
/// it gets a `Splitted Diagram` label, a trailing page break so every chunk
/// lands on its own page, and a near-full-width style.
///
/// Height tiers keep small diagrams from being blown up to page width:
/// below 150 the compact style caps the image at 40% page height, below 400
/// the medium style caps it at 60%, and taller images keep their natural
/// size.
#[must_use]
pub fn image_tag(uri: &str, height: i32, images_left: usize) -> String {
    let split = images_left > 1;
    let prefix = if split { "<b>Splitted Diagram</b>\n" } else { "" };
    let suffix = if split {
        format!("\n{PAGE_BREAK}\n")
    } else {
        String::new()
    };
    let wide = if split {
        r#" style="min-width: 90%;""#
    } else {
        ""
    };

    let img = if height < COMPACT_MAX_HEIGHT {
        format!(r#"<img src="{uri}" style="max-height: 40%; width: 90%;">"#)
    } else if height < MEDIUM_MAX_HEIGHT {
        format!(r#"<img src="{uri}" style="max-height: 60%; width: 90%;">"#)
    } else {
        format!(r#"<img src="{uri}"{wide}>"#)
    };

    format!("{prefix}{img}{suffix}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compact_tier_below_150() {
        let tag = image_tag("img/diagram_0.svg", 100, 1);
        assert_eq!(
            tag,
            r#"<img src="img/diagram_0.svg" style="max-height: 40%; width: 90%;">"#
        );
    }

    #[test]
    fn test_medium_tier_between_150_and_400() {
        let tag = image_tag("img/diagram_0.svg", 300, 1);
        assert!(tag.contains("max-height: 60%; width: 90%;"));
    }

    #[test]
    fn test_tall_tier_unconstrained() {
        let tag = image_tag("img/diagram_0.svg", 500, 1);
        assert_eq!(tag, r#"<img src="img/diagram_0.svg">"#);
    }

    #[test]
    fn test_tier_boundaries() {
        assert!(image_tag("d.svg", 149, 1).contains("max-height: 40%"));
        assert!(image_tag("d.svg", 150, 1).contains("max-height: 60%"));
        assert!(image_tag("d.svg", 399, 1).contains("max-height: 60%"));
        assert!(!image_tag("d.svg", 400, 1).contains("max-height"));
    }

    #[test]
    fn test_negative_height_is_compact() {
        assert!(image_tag("d.svg", -126, 1).contains("max-height: 40%"));
    }

    #[test]
    fn test_split_diagram_gets_label_and_page_break() {
        for height in [0, 200, 800] {
            let tag = image_tag("img/diagram_0_0.svg", height, 3);
            assert!(tag.starts_with("<b>Splitted Diagram</b>\n"), "height {height}");
            assert!(tag.ends_with(&format!("\n{PAGE_BREAK}\n")), "height {height}");
        }
    }

    #[test]
    fn test_split_diagram_tall_tier_widened() {
        let tag = image_tag("img/diagram_0_0.svg", 800, 2);
        assert!(tag.contains(r#"<img src="img/diagram_0_0.svg" style="min-width: 90%;">"#));
    }

    #[test]
    fn test_last_chunk_of_split_has_no_annotations() {
        let tag = image_tag("img/diagram_0_2.svg", 560, 1);
        assert!(!tag.contains("Splitted Diagram"));
        assert!(!tag.contains(PAGE_BREAK));
    }
}
