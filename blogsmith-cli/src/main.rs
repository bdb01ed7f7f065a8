use blogsmith_client::{
    Author, BlogUpdate, BlogsmithClient, ListBlogsParams, ListTemplatesParams, NewTemplate,
    PublishCustomization, TemplateStyle, TemplateUpdate,
};
use clap::Parser;
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate a new draft blog from a topic.
    Generate {
        #[clap(long)]
        topic: String,
        #[clap(long)]
        tone: String,
        #[clap(long)]
        length: i32,
    },
    List {
        #[clap(long)]
        page: Option<u32>,
        #[clap(long)]
        per_page: Option<u32>,
        #[clap(long)]
        search: Option<String>,
        #[clap(long)]
        sort_by: Option<String>,
        #[clap(long)]
        desc: bool,
    },
    Show {
        id: Uuid,
    },
    Update {
        id: Uuid,
        #[clap(long)]
        topic: Option<String>,
        #[clap(long)]
        content: Option<String>,
        #[clap(long)]
        tone: Option<String>,
        #[clap(long)]
        author: Option<String>,
        #[clap(long)]
        public: Option<bool>,
    },
    Publish {
        id: Uuid,
        #[clap(long)]
        author: Option<String>,
        #[clap(long)]
        author_image: Option<String>,
        #[clap(long)]
        template: Option<Uuid>,
        #[clap(long)]
        cover_image: Option<String>,
        #[clap(long)]
        accent_color: Option<String>,
    },
    Unpublish {
        id: Uuid,
    },
    /// Fetch a published blog by its public path, e.g. /public/blog/jane-doe/rust-tips.
    Public {
        path: String,
    },
    Delete {
        id: Uuid,
    },
    #[clap(subcommand)]
    Templates(TemplateCommand),
}

#[derive(Parser, Debug)]
enum TemplateCommand {
    List {
        #[clap(long)]
        search: Option<String>,
    },
    Show {
        id: Uuid,
    },
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        background: Option<String>,
        #[clap(long)]
        color: Option<String>,
    },
    Rename {
        id: Uuid,
        #[clap(long)]
        name: String,
    },
    Delete {
        id: Uuid,
    },
}

fn author_from(name: Option<String>, image: Option<String>) -> Option<Author> {
    name.map(|name| Author {
        name,
        image: image.unwrap_or_default(),
        id: None,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let client = BlogsmithClient::connect(&args.server)?;

    match args.command {
        Command::Generate {
            topic,
            tone,
            length,
        } => {
            let blog = client.create_blog(&topic, &tone, length).await?;
            println!("Blog generated! ID: {}", blog.id);
        }
        Command::List {
            page,
            per_page,
            search,
            sort_by,
            desc,
        } => {
            let params = ListBlogsParams {
                p: page,
                n: per_page,
                search,
                sort_by,
                order: desc.then(|| "desc".to_string()),
            };
            let page = client.list_blogs(&params).await?;
            println!("Blogs ({} total)", page.total);
            for blog in page.data {
                let state = blog.public_path.as_deref().filter(|_| blog.is_public);
                println!(
                    "- [{}] {} ({})",
                    blog.id,
                    blog.topic,
                    state.unwrap_or("draft")
                );
            }
        }
        Command::Show { id } => {
            let detail = client.get_blog(id).await?;
            println!("{}", detail.blog);
            if let Some(template) = detail.template_details {
                println!("\ntemplate: {}", template.name);
            }
        }
        Command::Update {
            id,
            topic,
            content,
            tone,
            author,
            public,
        } => {
            let update = BlogUpdate {
                topic,
                content,
                tone,
                author: author_from(author, None),
                is_public: public,
                ..Default::default()
            };
            let blog = client.update_blog(id, &update).await?;
            println!("Blog updated: {}", blog);
        }
        Command::Publish {
            id,
            author,
            author_image,
            template,
            cover_image,
            accent_color,
        } => {
            let customization = PublishCustomization {
                template,
                cover_image,
                accent_color,
                author: author_from(author, author_image),
                ..Default::default()
            };
            let blog = client.publish_blog(id, &customization).await?;
            println!(
                "Blog published at {}",
                blog.public_path.as_deref().unwrap_or("-")
            );
        }
        Command::Unpublish { id } => {
            client.unpublish_blog(id).await?;
            println!("Blog unpublished!");
        }
        Command::Public { path } => {
            let detail = client.public_blog_by_path(&path).await?;
            println!("{}", detail.blog);
        }
        Command::Delete { id } => {
            client.delete_blog(id).await?;
            println!("Blog deleted!");
        }
        Command::Templates(command) => run_template_command(&client, command).await?,
    }

    Ok(())
}

async fn run_template_command(
    client: &BlogsmithClient,
    command: TemplateCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        TemplateCommand::List { search } => {
            let params = ListTemplatesParams {
                search,
                ..Default::default()
            };
            let page = client.list_templates(&params).await?;
            println!("Templates ({} total)", page.total);
            for item in page.data {
                let marker = if item.is_system { " [system]" } else { "" };
                println!("- [{}] {}{}", item.template.id, item.template.name, marker);
            }
        }
        TemplateCommand::Show { id } => {
            let template = client.get_template(id).await?;
            println!("{} ({})", template.name, template.id);
            if let Some(description) = template.description {
                println!("{description}");
            }
        }
        TemplateCommand::Create {
            name,
            description,
            background,
            color,
        } => {
            let template = NewTemplate {
                name,
                description,
                style: TemplateStyle {
                    background,
                    color,
                    ..Default::default()
                },
                preview_image: None,
            };
            let template = client.create_template(&template).await?;
            println!("Template created! ID: {}", template.id);
        }
        TemplateCommand::Rename { id, name } => {
            let update = TemplateUpdate {
                name: Some(name),
                ..Default::default()
            };
            let template = client.update_template(id, &update).await?;
            println!("Template renamed to {}", template.name);
        }
        TemplateCommand::Delete { id } => {
            client.delete_template(id).await?;
            println!("Template deleted!");
        }
    }
    Ok(())
}
