//! Server-rendered HTML pages.
//!
//! Every visible string comes from the request's translator and is escaped
//! before it lands in markup.

use parlance_core::translation::Translator;

/// One entry of the language switcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageLink {
    pub code: String,
    /// Native language name, e.g. "Français".
    pub label: String,
    /// Current page in this language.
    pub href: String,
    pub active: bool,
}

pub struct PageContext<'a> {
    pub t: &'a Translator,
    pub site_name: &'a str,
    pub languages: &'a [LanguageLink],
}

impl PageContext<'_> {
    /// Translate and HTML-escape.
    fn tr(&self, key: &str) -> String {
        escape(self.t.t(key))
    }

    fn lang(&self) -> &str {
        self.t.locale()
    }
}

pub fn home(ctx: &PageContext) -> String {
    let lang = ctx.lang();
    let features = list_items(
        ctx,
        &["features.item1", "features.item2", "features.item3", "features.item4"],
    );

    let body = format!(
        r#"<main>
  <section>
    <h1>{title}</h1>
    <p class="subtitle">{subtitle}</p>
  </section>
  <section>
    <h2>{features_title}</h2>
    <ul class="features">{features}</ul>
  </section>
  <nav class="actions">
    <a class="primary" href="/{lang}/about">{get_started}</a>
    <a href="https://docs.rs/axum" target="_blank" rel="noopener noreferrer">{learn_more}</a>
  </nav>
</main>
<footer>
  <p>{copyright}</p>
  <p class="small">{made_with}</p>
</footer>"#,
        title = ctx.tr("welcome.title"),
        subtitle = ctx.tr("welcome.subtitle"),
        features_title = ctx.tr("features.title"),
        get_started = ctx.tr("actions.getStarted"),
        learn_more = ctx.tr("actions.learnMore"),
        copyright = ctx.tr("footer.copyright"),
        made_with = ctx.tr("footer.madeWith"),
    );

    layout(ctx, &ctx.tr("welcome.title"), &body)
}

pub fn about(ctx: &PageContext) -> String {
    let lang = ctx.lang();
    let steps = list_items(
        ctx,
        &["about.howTo1", "about.howTo2", "about.howTo3", "about.howTo4"],
    );
    let features = list_items(
        ctx,
        &[
            "about.feature1",
            "about.feature2",
            "about.feature3",
            "about.feature4",
            "about.feature5",
        ],
    );

    let body = format!(
        r#"<main>
  <a class="back" href="/{lang}">&larr; {home}</a>
  <h1>{about}</h1>
  <p>{intro}</p>
  <h2>{how_to}</h2>
  <ol>{steps}</ol>
  <h2>{features_title}</h2>
  <ul>{features}</ul>
  <p class="current-language">{current} <strong>{upper}</strong></p>
</main>"#,
        home = ctx.tr("navigation.home"),
        about = ctx.tr("navigation.about"),
        intro = ctx.tr("about.intro"),
        how_to = ctx.tr("about.howToTitle"),
        features_title = ctx.tr("about.featuresTitle"),
        current = ctx.tr("about.currentLanguage"),
        upper = escape(&lang.to_uppercase()),
    );

    layout(ctx, &ctx.tr("navigation.about"), &body)
}

pub fn not_found(ctx: &PageContext) -> String {
    let body = format!(
        r#"<main>
  <h1>{title}</h1>
  <p>{message}</p>
  <a href="/{lang}">{back}</a>
</main>"#,
        title = ctx.tr("notFound.title"),
        message = ctx.tr("notFound.message"),
        lang = ctx.lang(),
        back = ctx.tr("notFound.back"),
    );
    layout(ctx, &ctx.tr("notFound.title"), &body)
}

fn list_items(ctx: &PageContext, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| format!("<li>{}</li>", ctx.tr(key)))
        .collect()
}

/// Wrap `body` in the document shell with `<html lang>` and the switcher.
fn layout(ctx: &PageContext, title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} | {site}</title>
</head>
<body>
  <header>{switcher}</header>
{body}
</body>
</html>
"#,
        lang = ctx.lang(),
        site = escape(ctx.site_name),
        switcher = language_switcher(ctx),
    )
}

fn language_switcher(ctx: &PageContext) -> String {
    let links: String = ctx
        .languages
        .iter()
        .map(|link| {
            let current = if link.active {
                r#" class="active" aria-current="true""#
            } else {
                ""
            };
            format!(
                r#"<a href="{href}" hreflang="{code}" lang="{code}"{current}>{label}</a>"#,
                href = escape(&link.href),
                code = link.code,
                label = escape(&link.label),
            )
        })
        .collect();
    format!(
        r#"<nav class="language-switcher" aria-label="{label}">{links}</nav>"#,
        label = ctx.tr("navigation.switchLanguage"),
    )
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
