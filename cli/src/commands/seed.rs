use anyhow::{Context, Result};
use chrono::{Duration, SecondsFormat, Utc};
use prompt_library_shared::{ContentStore, PromptDraft};

struct Sample {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    featured: bool,
    days_ago: i64,
    content: &'static str,
}

const SAMPLES: [Sample; 3] = [
    Sample {
        slug: "efficient-workflow-sample",
        title: "高效工作流程提示",
        description: "帮助用户规划高效的工作流程，提高生产力的提示",
        category: "内容创作",
        tags: &["productivity", "workflow", "efficiency"],
        featured: true,
        days_ago: 5,
        content: "# 高效工作流程提示\n\n想要提高工作效率，你可以按照以下步骤：\n\n1. \
                  每天早上列出3-5个最重要的任务\n2. 使用番茄工作法\n3. 将大任务分解为小步骤\n4. \
                  减少干扰，设置特定的时间检查邮件和消息\n",
    },
    Sample {
        slug: "data-analysis-framework-sample",
        title: "数据分析框架",
        description: "系统性数据分析的步骤和方法",
        category: "数据分析",
        tags: &["data", "analysis", "framework"],
        featured: false,
        days_ago: 1,
        content: "# 数据分析框架\n\n1. **定义问题**\n2. **收集数据**\n3. **清洗数据**\n4. \
                  **探索性分析**\n5. **解释结果**\n6. **沟通发现**\n",
    },
    Sample {
        slug: "effective-learning-sample",
        title: "有效学习技巧",
        description: "提高学习效率和知识保留的方法",
        category: "教育学习",
        tags: &["learning", "education", "study"],
        featured: true,
        days_ago: 0,
        content: "# 有效学习技巧\n\n1. **分散练习**\n2. **检索练习**\n3. **交错学习**\n4. \
                  **费曼技巧**\n5. **反思**\n",
    },
];

/// Create the sample prompts when the library has none. Returns how many
/// were created.
pub async fn seed_samples(store: &dyn ContentStore) -> Result<usize> {
    let existing = store.list_slugs().await.context("failed to list prompts")?;
    if !existing.is_empty() {
        tracing::info!("Library already has {} prompts; nothing to seed", existing.len());
        return Ok(0);
    }

    let now = Utc::now();
    for sample in &SAMPLES {
        let created_at = (now - Duration::days(sample.days_ago)).to_rfc3339_opts(SecondsFormat::Millis, true);
        store
            .create(PromptDraft {
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                category: sample.category.to_string(),
                author: "系统".to_string(),
                tags: sample.tags.iter().map(|tag| (*tag).to_string()).collect(),
                content: sample.content.to_string(),
                featured: sample.featured,
                rating: None,
                created_at: Some(created_at),
                custom_slug: Some(sample.slug.to_string()),
            })
            .await
            .with_context(|| format!("failed to create sample {}", sample.slug))?;
        tracing::info!("Created sample prompt {}", sample.slug);
    }
    Ok(SAMPLES.len())
}

pub async fn run(store: &dyn ContentStore) -> Result<()> {
    let created = seed_samples(store).await?;
    tracing::info!("Seeded {created} sample prompts");
    Ok(())
}
