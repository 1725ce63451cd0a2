use maud::{html, Markup, DOCTYPE};

pub struct PageConfig<'a> {
    pub title: &'a str,
}

pub fn base(config: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.4/css/bulma.min.css";
                link rel="stylesheet" href="/static/styles.css";
                script src="https://cdn.jsdelivr.net/npm/htmx.org@1.9.10/dist/htmx.min.js" {}
            }
            body {
                section class="section" {
                    div class="container thermal-container" {
                        nav class="level mb-4" {
                            div class="level-left" {
                                a href="/" class="has-text-current" style="text-decoration: none;" {
                                    h1 class="title level-item" { "Thermal Skies" }
                                }
                            }
                            div class="level-right" {
                                p class="level-item" {
                                    a href="/docs" class="button is-link is-light is-small" {
                                        "API Docs"
                                    }
                                }
                            }
                        }

                        div id="main-content" {
                            (content)
                        }
                    }
                }
            }
        }
    }
}
