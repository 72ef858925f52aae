use crate::api::HttpPostApi;
use crate::config::Settings;
use crate::manager::PostManager;
use crate::model::Post;
use crate::ui;
use anyhow::{Context, Result};

pub fn list(settings: &Settings) -> Result<()> {
    let manager = connect(settings)?;
    print_posts(manager.items());
    Ok(())
}

pub fn add(settings: &Settings, title: String, description: String) -> Result<()> {
    let mut manager = connect(settings)?;
    let created = manager
        .create(&title, &description)
        .context("creating post")?;
    println!("Created post {}", created.id);
    print_posts(manager.items());
    Ok(())
}

pub fn edit(
    settings: &Settings,
    id: String,
    title: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let mut manager = connect(settings)?;
    manager
        .begin_edit(&id)
        .with_context(|| format!("editing post {}", id))?;
    if let Some(t) = title {
        manager.set_title_input(t);
    }
    if let Some(d) = description {
        manager.set_description_input(d);
    }
    manager
        .submit()
        .with_context(|| format!("updating post {}", id))?;
    println!("Updated post {}", id);
    print_posts(manager.items());
    Ok(())
}

pub fn delete(settings: &Settings, id: String) -> Result<()> {
    let mut manager = PostManager::new(client(settings)?);
    manager
        .delete(&id)
        .with_context(|| format!("deleting post {}", id))?;
    println!("Deleted post {}", id);
    print_posts(manager.items());
    Ok(())
}

pub fn search(settings: &Settings, query: String) -> Result<()> {
    let mut manager = PostManager::new(client(settings)?);
    manager
        .search(&query)
        .with_context(|| format!("searching for {:?}", query))?;
    print_posts(manager.items());
    Ok(())
}

pub fn tui(settings: &Settings) -> Result<()> {
    let mut manager = PostManager::new(client(settings)?);
    // A failed initial fetch only leaves the list empty; the TUI shows it.
    let initial = manager.fetch_all();
    ui::run(manager, initial.err())
}

fn client(settings: &Settings) -> Result<HttpPostApi> {
    HttpPostApi::new(&settings.server).with_context(|| format!("connecting to {}", settings.server))
}

fn connect(settings: &Settings) -> Result<PostManager<HttpPostApi>> {
    let mut manager = PostManager::new(client(settings)?);
    manager
        .fetch_all()
        .with_context(|| format!("fetching posts from {}", settings.server))?;
    Ok(manager)
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("(no posts)");
        return;
    }
    for post in posts {
        print_post(post);
    }
}

fn print_post(post: &Post) {
    println!("- {}: {}", post.id, post.title);
    for line in post.description.lines() {
        println!("    {}", line);
    }
}
