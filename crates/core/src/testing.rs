//! Synthetic wiki pages for tests and benchmarks.
//!
//! [`EntityPage`] renders a character page in the same shape as the wiki:
//! info card, tabbed data panel, and an ascension table whose odd rows lose
//! their merged first cell. Stat values are `1000 + i` (HP), `2000 + i` (ATK)
//! and `3000 + i` (DEF) for level index `i`.

use crate::stats::{LEVEL_COUNT, LEVELS};

/// How the region appears on the page.
#[derive(Debug, Clone, Copy)]
pub enum Region {
    /// A link directly under the region value.
    Direct(&'static str),
    /// A link nested in a list item.
    Nested(&'static str),
    /// No region section at all.
    Missing,
}

/// Builder for a synthetic entity page.
#[derive(Debug, Clone)]
pub struct EntityPage {
    name: String,
    rarity_title: String,
    weapon: String,
    element: String,
    body_type: String,
    region: Region,
    release_date: String,
    ascension_stat: String,
    levels: usize,
}

impl EntityPage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rarity_title: "4 Stars".to_string(),
            weapon: "Bow".to_string(),
            element: "Pyro".to_string(),
            body_type: "Medium Female".to_string(),
            region: Region::Direct("Mondstadt City"),
            release_date: "September 28, 2020".to_string(),
            ascension_stat: "ATK".to_string(),
            levels: LEVEL_COUNT,
        }
    }

    pub fn rarity_title(mut self, value: impl Into<String>) -> Self {
        self.rarity_title = value.into();
        self
    }

    pub fn weapon(mut self, value: impl Into<String>) -> Self {
        self.weapon = value.into();
        self
    }

    pub fn element(mut self, value: impl Into<String>) -> Self {
        self.element = value.into();
        self
    }

    pub fn body_type(mut self, value: impl Into<String>) -> Self {
        self.body_type = value.into();
        self
    }

    pub fn region(mut self, value: Region) -> Self {
        self.region = value;
        self
    }

    pub fn release_date(mut self, value: impl Into<String>) -> Self {
        self.release_date = value.into();
        self
    }

    pub fn ascension_stat(mut self, value: impl Into<String>) -> Self {
        self.ascension_stat = value.into();
        self
    }

    /// Number of genuine level rows in the stat table.
    pub fn levels(mut self, value: usize) -> Self {
        self.levels = value;
        self
    }

    pub fn render(&self) -> String {
        let region = match self.region {
            Region::Direct(title) => format!(
                r#"<div class="pi-item pi-data" data-source="region"><h3>Region</h3><div class="pi-data-value"><a href="/wiki/{title}" title="{title}">{title}</a></div></div>"#
            ),
            Region::Nested(title) => format!(
                r#"<div class="pi-item pi-data" data-source="region"><h3>Region</h3><div class="pi-data-value"><ul><li><a href="/wiki/{title}" title="{title}">{title}</a></li></ul></div></div>"#
            ),
            Region::Missing => String::new(),
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head><title>{name} | Wiki</title></head>
<body>
<main class="page-content">
<aside class="portable-infobox pi-theme-wikia">
<h2 class="pi-item pi-title">{name}</h2>
<section class="pi-item pi-group"><table class="pi-horizontal-group"><tbody><tr>
<td data-source="rarity"><img src="/images/rarity.png" alt="{rarity}" title="{rarity}"></td>
<td data-source="weapon">{weapon}</td>
<td data-source="element">{element}</td>
</tr></tbody></table></section>
<section class="pi-item pi-panel">
<div class="wds-tabs__wrapper"><ul class="wds-tabs"><li class="wds-tabs__tab">Bio</li></ul></div>
<div class="wds-tab__content wds-is-current">
<div class="pi-item pi-data" data-source="gender"><h3>Body Type</h3><div class="pi-data-value"><a href="/wiki/Body_Type" title="{body}">{body}</a></div></div>
{region}
<div class="pi-item pi-data" data-source="releaseDate"><h3>Release Date</h3><div class="pi-data-value">{date}<br><small>Version 1.0</small></div></div>
</div>
</section>
</aside>
<table class="wikitable ascension-stats"><tbody>
{rows}
</tbody></table>
</main>
</body>
</html>
"#,
            name = self.name,
            rarity = self.rarity_title,
            weapon = self.weapon,
            element = self.element,
            body = self.body_type,
            region = region,
            date = self.release_date,
            rows = stat_rows(self.levels, &self.ascension_stat),
        )
    }
}

fn stat_rows(levels: usize, ascension_stat: &str) -> String {
    let mut rows = format!(
        r#"<tr><th>Asc.</th><th>Lv.</th><th>Base HP</th><th>Base ATK</th><th>Base DEF</th><th><span><b><a href="/wiki/Stat">{ascension_stat}</a></b></span></th></tr>"#
    );
    rows.push('\n');

    for i in 0..levels {
        let label = LEVELS.get(i).copied().unwrap_or("90/90");
        let (hp, atk, def) = (1000 + i, 2000 + i, 3000 + i);

        if i % 2 == 0 {
            rows.push_str(&format!(
                r#"<tr class="level-row"><td rowspan="2">{phase}</td><td>{label}</td><td>{hp}</td><td>{atk}</td><td>{def}</td><td>0%</td></tr>"#,
                phase = i / 2
            ));
        } else {
            rows.push_str(&format!(
                r#"<tr><td>{label}</td><td>{hp}</td><td>{atk}</td><td>{def}</td><td>0%</td></tr>"#
            ));
            if i + 1 < levels {
                rows.push_str(r#"<tr class="ascension"><td colspan="6">Ascension</td></tr>"#);
            }
        }
        rows.push('\n');
    }

    rows
}

/// Renders a category listing page linking to `hrefs`, in order.
pub fn listing_page(hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| format!(r#"<li class="category-page__member"><a href="{href}" title="{href}">{href}</a></li>"#))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html><body>
<div class="category-page__members">
<ul class="category-page__members-for-char">
<li class="category-page__member">Not a link</li>
{items}
</ul>
</div>
</body></html>
"#
    )
}
