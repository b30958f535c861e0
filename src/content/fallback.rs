// src/content/fallback.rs - example data shown in demo mode
use super::record::{Post, Project};
use chrono::{DateTime, NaiveDate, Utc};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn projects() -> Vec<Project> {
    vec![
        Project {
            id: Some("1".into()),
            title: "E-Commerce Platform".into(),
            description: "A modern e-commerce platform built with Next.js, TypeScript, and Stripe integration. Features include user authentication, product catalog, shopping cart, and payment processing.".into(),
            image_url: "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=800&h=600&fit=crop".into(),
            live_url: Some("https://example-ecommerce.com".into()),
            github_url: Some("https://github.com/example/ecommerce".into()),
            technologies: strings(&["Next.js", "TypeScript", "Stripe", "Tailwind CSS", "Firebase"]),
            created_at: day(2024, 1, 15),
            author_id: None,
            author_name: None,
        },
        Project {
            id: Some("2".into()),
            title: "Task Management App".into(),
            description: "A collaborative task management application with real-time updates, drag-and-drop functionality, and team collaboration features.".into(),
            image_url: "https://images.unsplash.com/photo-1454165804606-c3d57bc86b40?w=800&h=600&fit=crop".into(),
            live_url: Some("https://example-taskapp.com".into()),
            github_url: Some("https://github.com/example/taskapp".into()),
            technologies: strings(&["React", "Node.js", "Socket.io", "MongoDB", "Express"]),
            created_at: day(2024, 2, 20),
            author_id: None,
            author_name: None,
        },
        Project {
            id: Some("3".into()),
            title: "Weather Dashboard".into(),
            description: "A beautiful weather dashboard that displays current weather conditions, forecasts, and interactive maps using weather APIs.".into(),
            image_url: "https://images.unsplash.com/photo-1592210454359-9043f067919b?w=800&h=600&fit=crop".into(),
            live_url: Some("https://example-weather.com".into()),
            github_url: Some("https://github.com/example/weather".into()),
            technologies: strings(&["Vue.js", "OpenWeather API", "Chart.js", "CSS3", "HTML5"]),
            created_at: day(2024, 3, 10),
            author_id: None,
            author_name: None,
        },
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        Post {
            id: Some("1".into()),
            title: "Getting Started with Next.js 14".into(),
            content: "Next.js 14 introduces several new features including the App Router, Server Components, and improved performance. In this post, we'll explore how to get started with the latest version and build a modern web application.".into(),
            excerpt: "Learn how to build modern web applications with Next.js 14 and its new features including the App Router and Server Components.".into(),
            author: "Test User".into(),
            tags: strings(&["Next.js", "React", "Web Development", "Tutorial"]),
            created_at: day(2024, 1, 10),
            author_id: None,
            author_name: None,
        },
        Post {
            id: Some("2".into()),
            title: "Mastering TypeScript for React Development".into(),
            content: "TypeScript has become an essential tool for React development, providing better type safety and developer experience. This comprehensive guide covers everything you need to know about using TypeScript with React.".into(),
            excerpt: "A comprehensive guide to using TypeScript with React for better type safety and developer experience.".into(),
            author: "Test User".into(),
            tags: strings(&["TypeScript", "React", "JavaScript", "Programming"]),
            created_at: day(2024, 2, 15),
            author_id: None,
            author_name: None,
        },
        Post {
            id: Some("3".into()),
            title: "Building Responsive UIs with Tailwind CSS".into(),
            content: "Tailwind CSS has revolutionized the way we build user interfaces. Learn how to create beautiful, responsive designs using utility-first CSS framework and best practices.".into(),
            excerpt: "Learn how to create beautiful, responsive user interfaces using Tailwind CSS utility-first approach.".into(),
            author: "Test User".into(),
            tags: strings(&["Tailwind CSS", "CSS", "UI/UX", "Design"]),
            created_at: day(2024, 3, 5),
            author_id: None,
            author_name: None,
        },
    ]
}
