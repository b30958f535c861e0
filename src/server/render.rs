// =====================================================
// FILE: src/server/render.rs - HTML PAGES
// =====================================================

use crate::auth::Actor;
use crate::content::{ContentRecord, ContentSection, Notice, NoticeLevel, Post, Project};
use crate::core::helpers::escape_html;
use crate::i18n::{switch_locale, Locale};
use chrono::{Datelike, Utc};

const LAYOUT: &str = include_str!("templates/layout.html");
const HOME: &str = include_str!("templates/home.html");
const ADMIN: &str = include_str!("templates/admin.html");
const SIGN_IN: &str = include_str!("templates/sign_in.html");

const SKILLS: &[&str] = &[
    "React/Next.js",
    "TypeScript",
    "Node.js",
    "Python",
    "Firebase",
    "Tailwind CSS",
];

const CONTACT_EMAIL: &str = "contact@example.com";
const CONTACT_PHONE: &str = "+1 (555) 123-4567";
const CONTACT_LOCATION: &str = "Tashkent, Uzbekistan";

/// Outcome of the last contact form post, carried back in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Sent,
    Failed,
}

impl ContactStatus {
    pub fn from_query(value: Option<&str>) -> Option<Self> {
        match value {
            Some("sent") => Some(Self::Sent),
            Some("failed") => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_query(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

/// Per-request page context.
pub struct Page<'a> {
    pub locale: Locale,
    pub path: &'a str,
    pub site_title: &'a str,
    pub actor: Option<&'a Actor>,
}

impl Page<'_> {
    fn t(&self, key: &str) -> String {
        escape_html(&crate::t!(self.locale, key))
    }

    fn t_with(&self, key: &str, param: &str) -> String {
        escape_html(&crate::t!(self.locale, key, param))
    }

    fn layout(&self, title: &str, body: String) -> String {
        LAYOUT
            .replace("{{LANG}}", self.locale.code())
            .replace("{{TITLE}}", &escape_html(title))
            .replace("{{SITE_TITLE}}", &escape_html(self.site_title))
            .replace("{{NAV}}", &self.nav())
            .replace("{{LANGUAGE_LABEL}}", &self.t("nav.language"))
            .replace("{{SWITCHER}}", &self.switcher())
            .replace(
                "{{FOOTER}}",
                &self.t_with("footer.rights", &Utc::now().year().to_string()),
            )
            .replace("{{BODY}}", &body)
    }

    fn nav(&self) -> String {
        let code = self.locale.code();
        [
            ("home", "nav.home"),
            ("about", "nav.about"),
            ("projects", "nav.projects"),
            ("blog", "nav.blog"),
            ("contact", "nav.contact"),
        ]
        .iter()
        .map(|(anchor, key)| format!(r##"<a href="/{}#{}">{}</a>"##, code, anchor, self.t(key)))
        .chain(std::iter::once(format!(
            r#"<a href="/{}/admin">{}</a>"#,
            code,
            self.t("nav.admin")
        )))
        .chain(
            self.actor
                .map(|a| format!(r#"<span class="meta">{}</span>"#, escape_html(a.label()))),
        )
        .collect::<Vec<_>>()
        .join("\n            ")
    }

    /// One link per locale, each keeping the rest of the current path.
    fn switcher(&self) -> String {
        Locale::ALL
            .iter()
            .map(|&target| {
                let class = if target == self.locale { " class=\"active\"" } else { "" };
                format!(
                    r#"<a href="{}"{} title="{}">{} {}</a>"#,
                    escape_html(&switch_locale(self.path, self.locale, target)),
                    class,
                    escape_html(target.native_name()),
                    target.flag(),
                    target.code().to_uppercase()
                )
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

fn labels(items: &[String]) -> String {
    items
        .iter()
        .map(|l| format!(r#"<span class="label">{}</span>"#, escape_html(l)))
        .collect()
}

fn banners(notices: &[Notice], demo: Option<String>) -> String {
    let demo = demo.map(|text| format!(r#"<div class="banner demo">{}</div>"#, text));
    demo.into_iter()
        .chain(notices.iter().map(|n| {
            let class = match n.level {
                NoticeLevel::Success => "success",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            format!(r#"<div class="banner {}">{}</div>"#, class, escape_html(&n.text))
        }))
        .collect()
}

fn project_card(page: &Page, project: &Project) -> String {
    let mut links = Vec::new();
    if let Some(url) = &project.live_url {
        links.push(format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(url),
            page.t("projects.live_demo")
        ));
    }
    if let Some(url) = &project.github_url {
        links.push(format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_html(url),
            page.t("projects.source_code")
        ));
    }

    format!(
        r#"                <article class="card">
                    <img src="{}" alt="{}">
                    <div class="body">
                        <h3>{}</h3>
                        <p>{}</p>
                        <div class="labels">{}</div>
                        <p>{}</p>
                    </div>
                </article>"#,
        escape_html(&project.image_url),
        escape_html(&project.title),
        escape_html(&project.title),
        escape_html(&project.description),
        labels(&project.technologies),
        links.join(" &middot; ")
    )
}

fn post_card(page: &Page, post: &Post) -> String {
    format!(
        r#"                <article class="card">
                    <div class="body">
                        <h3>{}</h3>
                        <p class="meta">{} &middot; {}</p>
                        <p>{}</p>
                        <div class="labels">{}</div>
                    </div>
                </article>"#,
        escape_html(&post.title),
        page.t_with("blog.by", post.author.as_str()),
        post.created_at.format("%Y-%m-%d"),
        escape_html(&post.excerpt),
        labels(&post.tags)
    )
}

fn cards<R: ContentRecord>(
    section: &ContentSection<R>,
    empty: String,
    card: impl Fn(&R) -> String,
) -> String {
    if section.records().is_empty() {
        format!(r#"                <p class="meta">{}</p>"#, empty)
    } else {
        section
            .records()
            .iter()
            .map(card)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn demo_text<R: ContentRecord>(page: &Page, section: &ContentSection<R>, key: &str) -> Option<String> {
    section.mode().is_fallback().then(|| page.t(key))
}

pub fn home(
    page: &Page,
    projects: &ContentSection<Project>,
    posts: &ContentSection<Post>,
    contact: Option<ContactStatus>,
) -> String {
    let skills: Vec<String> = SKILLS.iter().map(|s| s.to_string()).collect();
    let contact_status = match contact {
        Some(ContactStatus::Sent) => format!(
            r#"<div class="banner success">{}</div>"#,
            page.t("contact.sent")
        ),
        Some(ContactStatus::Failed) => format!(
            r#"<div class="banner error">{}</div>"#,
            page.t("contact.failed")
        ),
        None => String::new(),
    };
    let contact_info = [
        (page.t("contact.email"), format!("mailto:{}", CONTACT_EMAIL), CONTACT_EMAIL),
        (page.t("contact.phone"), "tel:+15551234567".to_string(), CONTACT_PHONE),
        (page.t("contact.location"), "#contact".to_string(), CONTACT_LOCATION),
    ]
    .iter()
    .map(|(title, href, value)| {
        format!(
            r#"                <li>{}: <a href="{}">{}</a></li>"#,
            title,
            escape_html(href),
            escape_html(value)
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    let body = HOME
        .replace("{{LANG}}", page.locale.code())
        .replace("{{SITE_TITLE}}", &escape_html(page.site_title))
        .replace("{{HERO_GREETING}}", &page.t("hero.greeting"))
        .replace("{{HERO_TITLE}}", &page.t("hero.title"))
        .replace("{{HERO_DESCRIPTION}}", &page.t("hero.description"))
        .replace("{{HERO_CTA_PROJECTS}}", &page.t("hero.cta_projects"))
        .replace("{{HERO_CTA_CONTACT}}", &page.t("hero.cta_contact"))
        .replace("{{ABOUT_TITLE}}", &page.t("about.title"))
        .replace("{{ABOUT_SUBTITLE}}", &page.t("about.subtitle"))
        .replace("{{ABOUT_DESCRIPTION}}", &page.t("about.description"))
        .replace("{{ABOUT_SKILLS}}", &page.t("about.skills"))
        .replace("{{SKILLS}}", &labels(&skills))
        .replace("{{PROJECTS_TITLE}}", &page.t("projects.title"))
        .replace("{{PROJECTS_SUBTITLE}}", &page.t("projects.subtitle"))
        .replace(
            "{{PROJECTS_BANNERS}}",
            &banners(
                projects.notices(),
                demo_text(page, projects, "projects.demo_mode"),
            ),
        )
        .replace(
            "{{PROJECTS}}",
            &cards(projects, page.t("projects.empty"), |p| project_card(page, p)),
        )
        .replace("{{BLOG_TITLE}}", &page.t("blog.title"))
        .replace("{{BLOG_SUBTITLE}}", &page.t("blog.subtitle"))
        .replace(
            "{{POSTS_BANNERS}}",
            &banners(posts.notices(), demo_text(page, posts, "blog.demo_mode")),
        )
        .replace(
            "{{POSTS}}",
            &cards(posts, page.t("blog.empty"), |p| post_card(page, p)),
        )
        .replace("{{CONTACT_TITLE}}", &page.t("contact.title"))
        .replace("{{CONTACT_SUBTITLE}}", &page.t("contact.subtitle"))
        .replace("{{CONTACT_STATUS}}", &contact_status)
        .replace("{{CONTACT_INFO}}", &contact_info)
        .replace("{{CONTACT_NAME}}", &page.t("contact.name"))
        .replace("{{CONTACT_EMAIL}}", &page.t("contact.email"))
        .replace("{{CONTACT_MESSAGE}}", &page.t("contact.message"))
        .replace("{{CONTACT_SEND}}", &page.t("contact.send"));

    page.layout(page.site_title, body)
}

/// One editor field: the form name it posts as, its label and current value.
struct Input {
    name: &'static str,
    label: &'static str,
    value: String,
    multiline: bool,
}

impl Input {
    fn line(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            value: value.into(),
            multiline: false,
        }
    }

    fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            multiline: true,
            ..Self::line(name, label, value)
        }
    }
}

fn project_inputs(project: Option<&Project>) -> Vec<Input> {
    let url = |u: Option<&String>| u.cloned().unwrap_or_default();
    vec![
        Input::line("title", "field.title", project.map(|p| p.title.clone()).unwrap_or_default()),
        Input::text(
            "description",
            "field.description",
            project.map(|p| p.description.clone()).unwrap_or_default(),
        ),
        Input::line(
            "imageUrl",
            "field.image_url",
            project.map(|p| p.image_url.clone()).unwrap_or_default(),
        ),
        Input::line(
            "technologies",
            "field.technologies",
            project.map(|p| p.technologies.join(", ")).unwrap_or_default(),
        ),
        Input::line("liveUrl", "field.live_url", url(project.and_then(|p| p.live_url.as_ref()))),
        Input::line(
            "githubUrl",
            "field.github_url",
            url(project.and_then(|p| p.github_url.as_ref())),
        ),
    ]
}

fn post_inputs(post: Option<&Post>) -> Vec<Input> {
    vec![
        Input::line("title", "field.title", post.map(|p| p.title.clone()).unwrap_or_default()),
        Input::text(
            "excerpt",
            "field.excerpt",
            post.map(|p| p.excerpt.clone()).unwrap_or_default(),
        ),
        Input::text(
            "content",
            "field.content",
            post.map(|p| p.content.clone()).unwrap_or_default(),
        ),
        Input::line("author", "field.author", post.map(|p| p.author.clone()).unwrap_or_default()),
        Input::line("tags", "field.tags", post.map(|p| p.tags.join(", ")).unwrap_or_default()),
    ]
}

fn editor_form(page: &Page, action: &str, inputs: &[Input], submit: &str) -> String {
    let fields: String = inputs
        .iter()
        .map(|input| {
            let control = if input.multiline {
                format!(
                    r#"<textarea name="{}" rows="4">{}</textarea>"#,
                    input.name,
                    escape_html(&input.value)
                )
            } else {
                format!(
                    r#"<input name="{}" value="{}">"#,
                    input.name,
                    escape_html(&input.value)
                )
            };
            format!("<label>{}{}</label>", page.t(input.label), control)
        })
        .collect();
    format!(
        r#"<form class="editor" method="post" action="{}">{}<button class="button" type="submit">{}</button></form>"#,
        escape_html(action),
        fields,
        submit
    )
}

/// The section table. Add, edit and delete controls exist only while the
/// section is live; demo data is read-only.
fn editor<R: ContentRecord>(
    page: &Page,
    section: &ContentSection<R>,
    inputs: impl Fn(Option<&R>) -> Vec<Input>,
) -> String {
    let live = !section.mode().is_fallback();
    let base = format!("/{}/admin/{}", page.locale.code(), R::KIND.slug());

    let rows = section
        .records()
        .iter()
        .map(|r| {
            let actions = match (live, r.id()) {
                (true, Some(id)) => {
                    let target = format!("{}/{}", base, id);
                    format!(
                        r#"<td><details><summary>{}</summary>{}</details><form method="post" action="{}/delete"><button class="button danger" type="submit">{}</button></form></td>"#,
                        page.t("admin.edit"),
                        editor_form(page, &target, &inputs(Some(r)), &page.t("admin.save")),
                        escape_html(&target),
                        page.t("admin.delete")
                    )
                }
                _ => String::new(),
            };
            format!(
                "                <tr><td>{}</td><td>{}</td><td class=\"meta\">{}</td>{}</tr>",
                escape_html(r.title()),
                labels(r.labels()),
                r.created_at().format("%Y-%m-%d"),
                actions
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let create = if live {
        format!(
            "<details class=\"add\"><summary>{}</summary>{}</details>\n",
            page.t("admin.add"),
            editor_form(page, &base, &inputs(None), &page.t("admin.add"))
        )
    } else {
        String::new()
    };

    format!("{}            <table>\n{}\n            </table>", create, rows)
}

fn mode_text<R: ContentRecord>(page: &Page, section: &ContentSection<R>) -> String {
    if section.mode().is_fallback() {
        page.t("admin.mode_fallback")
    } else {
        page.t("admin.mode_live")
    }
}

/// `flash` is a notice carried over from the write that redirected here.
pub fn admin(
    page: &Page,
    actor: &Actor,
    projects: &ContentSection<Project>,
    posts: &ContentSection<Post>,
    flash: Option<&Notice>,
) -> String {
    let notices: Vec<Notice> = flash
        .into_iter()
        .chain(projects.notices())
        .chain(posts.notices())
        .cloned()
        .collect();

    let body = ADMIN
        .replace("{{LANG}}", page.locale.code())
        .replace("{{ADMIN_TITLE}}", &page.t("admin.title"))
        .replace("{{SIGNED_IN_AS}}", &page.t_with("admin.signed_in_as", actor.label()))
        .replace("{{SIGN_OUT}}", &page.t("admin.sign_out"))
        .replace("{{BANNERS}}", &banners(&notices, None))
        .replace("{{PROJECTS_LABEL}}", &page.t("admin.projects"))
        .replace("{{POSTS_LABEL}}", &page.t("admin.posts"))
        .replace(
            "{{PROJECTS_TOTAL}}",
            &page.t_with("admin.total", &projects.records().len().to_string()),
        )
        .replace(
            "{{POSTS_TOTAL}}",
            &page.t_with("admin.total", &posts.records().len().to_string()),
        )
        .replace("{{PROJECTS_MODE}}", &mode_text(page, projects))
        .replace("{{POSTS_MODE}}", &mode_text(page, posts))
        .replace("{{PROJECT_EDITOR}}", &editor(page, projects, project_inputs))
        .replace("{{POST_EDITOR}}", &editor(page, posts, post_inputs));

    page.layout(&crate::t!(page.locale, "admin.title"), body)
}

pub fn sign_in(page: &Page, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<div class="banner error">{}</div>"#, escape_html(e)))
        .unwrap_or_default();

    let body = SIGN_IN
        .replace("{{LANG}}", page.locale.code())
        .replace("{{ADMIN_TITLE}}", &page.t("admin.title"))
        .replace("{{SIGN_IN_REQUIRED}}", &page.t("admin.sign_in_required"))
        .replace("{{ERROR}}", &error)
        .replace("{{EMAIL}}", &page.t("admin.email"))
        .replace("{{PASSWORD}}", &page.t("admin.password"))
        .replace("{{SIGN_IN}}", &page.t("admin.sign_in"));

    page.layout(&crate::t!(page.locale, "admin.sign_in"), body)
}
