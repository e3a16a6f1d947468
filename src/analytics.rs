//! Yandex Metrika page-view counter.
//!
//! The tag is fire-and-forget: a loader script, one `init` call, a hit on
//! every hash change and a `<noscript>` tracking pixel. Nothing here talks
//! to the network at build time.

use crate::config::AnalyticsConfig;
use maud::{Markup, PreEscaped, html};

const TAG_URL: &str = "https://mc.yandex.ru/metrika/tag.js";
const WATCH_URL: &str = "https://mc.yandex.ru/watch";

/// URL reported for a page view: path, then `?query` when non-empty, then
/// the hash verbatim.
pub fn hit_url(path: &str, query: &str, hash: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        format!("{path}{hash}")
    } else {
        format!("{path}?{query}{hash}")
    }
}

fn loader_script(id: u64) -> String {
    format!(
        r#"(function(m,e,t,r,i,k,a){{
  m[i]=m[i]||function(){{(m[i].a=m[i].a||[]).push(arguments)}};
  m[i].l=1*new Date();
  for (var j = 0; j < document.scripts.length; j++) {{ if (document.scripts[j].src === r) {{ return; }} }}
  k=e.createElement(t),a=e.getElementsByTagName(t)[0],k.async=1,k.src=r,a.parentNode.insertBefore(k,a)
}})(window, document, 'script', '{TAG_URL}?id={id}', 'ym');
ym({id}, "init", {{ defer: true, clickmap: true, trackLinks: true, accurateTrackBounce: true, webvisor: true }});
ym({id}, "hit", location.pathname + location.search + location.hash);
window.addEventListener("hashchange", function () {{
  ym({id}, "hit", location.pathname + location.search + location.hash);
}});"#
    )
}

/// Counter markup for the end of `<body>`. Empty when disabled or when no
/// counter id is configured.
pub fn render_yandex_metrika(config: &AnalyticsConfig) -> Markup {
    let Some(id) = config.yandex_metrika_id.filter(|_| config.enabled) else {
        return html! {};
    };
    html! {
        script id="yandex-metrika" { (PreEscaped(loader_script(id))) }
        noscript {
            div {
                img src={ (WATCH_URL) "/" (id) } style="position:absolute; left:-9999px;" alt="";
            }
        }
    }
}
