use super::{values, MappingContext};
use crate::errors::MappingResult;
use crate::field_registry::RecordTypeColumn as Col;
use crate::models::{
    CellValue, ChangeRequest, CreateRecordType, OwnershipType, PrimaryFieldMetadata,
    RecordTypeMetadata, RequiredLevel, StringFormat,
};

pub(super) fn map_create(ctx: &MappingContext<'_>, row: &[CellValue]) -> MappingResult<ChangeRequest> {
    let locale = ctx.locale();
    let mut request = CreateRecordType {
        solution_unique_name: None,
        record_type: RecordTypeMetadata {
            schema_name: String::new(),
            display_name: None,
            display_collection_name: None,
            description: None,
            ownership: ctx.default_or(Col::OwnershipType, OwnershipType::UserOwned),
            color: None,
            is_business_process_enabled: ctx.default_or(Col::IsBusinessProcessEnabled, false),
            is_connections_enabled: ctx.default_or(Col::IsConnectionsEnabled, false),
            is_mail_merge_enabled: ctx.default_or(Col::IsMailMergeEnabled, false),
            is_document_management_enabled: ctx.default_or(Col::IsDocumentManagementEnabled, false),
            is_valid_for_queue: ctx.default_or(Col::IsValidForQueue, false),
            is_knowledge_management_enabled: ctx.default_or(Col::IsKnowledgeManagementEnabled, false),
            is_quick_create_enabled: ctx.default_or(Col::IsQuickCreateEnabled, false),
            is_duplicate_detection_enabled: ctx.default_or(Col::IsDuplicateDetectionEnabled, false),
            is_audit_enabled: ctx.default_or(Col::IsAuditEnabled, false),
            change_tracking_enabled: ctx.default_or(Col::ChangeTrackingEnabled, false),
            is_visible_in_mobile: ctx.default_or(Col::IsVisibleInMobile, false),
            is_visible_in_mobile_client: ctx.default_or(Col::IsVisibleInMobileClient, false),
            is_read_only_in_mobile_client: ctx.default_or(Col::IsReadOnlyInMobileClient, false),
            is_available_offline: ctx.default_or(Col::IsAvailableOffline, false),
            help_url_enabled: ctx.default_or(Col::HelpUrlEnabled, false),
            help_url: None,
        },
        primary_field: PrimaryFieldMetadata {
            schema_name: ctx.default_text(Col::PrimaryFieldSchemaName, "new_Name"),
            display_name: locale.label(ctx.default_text(Col::PrimaryFieldDisplayName, "Name")),
            description: None,
            max_length: i32::try_from(ctx.default_int(Col::PrimaryFieldMaxLength, 100)).unwrap_or(100),
            format: StringFormat::Text,
            required_level: RequiredLevel::ApplicationRequired,
        },
        has_notes: ctx.default_or(Col::HasNotes, false),
        has_activities: ctx.default_or(Col::HasActivities, false),
    };

    ctx.for_each_cell(row, |column: Col, cell| {
        let record_type = &mut request.record_type;
        match column {
            Col::SolutionUniqueName => request.solution_unique_name = Some(values::text(cell)),
            Col::SchemaName => record_type.schema_name = values::text(cell),
            Col::DisplayName => record_type.display_name = Some(ctx.label(cell)),
            Col::DisplayCollectionName => record_type.display_collection_name = Some(ctx.label(cell)),
            Col::Description => record_type.description = Some(ctx.label(cell)),
            Col::OwnershipType => record_type.ownership = ctx.option(column, cell)?,
            Col::Color => record_type.color = Some(values::text(cell)),
            Col::PrimaryFieldSchemaName => request.primary_field.schema_name = values::text(cell),
            Col::PrimaryFieldDisplayName => request.primary_field.display_name = ctx.label(cell),
            Col::PrimaryFieldMaxLength => request.primary_field.max_length = ctx.int32(column, cell)?,
            Col::PrimaryFieldDescription => request.primary_field.description = Some(ctx.label(cell)),
            Col::IsBusinessProcessEnabled => record_type.is_business_process_enabled = ctx.flag(column, cell)?,
            Col::HasNotes => request.has_notes = ctx.flag(column, cell)?,
            Col::HasActivities => request.has_activities = ctx.flag(column, cell)?,
            Col::IsConnectionsEnabled => record_type.is_connections_enabled = ctx.flag(column, cell)?,
            Col::IsMailMergeEnabled => record_type.is_mail_merge_enabled = ctx.flag(column, cell)?,
            Col::IsDocumentManagementEnabled => {
                record_type.is_document_management_enabled = ctx.flag(column, cell)?
            }
            Col::IsValidForQueue => record_type.is_valid_for_queue = ctx.flag(column, cell)?,
            Col::IsKnowledgeManagementEnabled => {
                record_type.is_knowledge_management_enabled = ctx.flag(column, cell)?
            }
            Col::IsQuickCreateEnabled => record_type.is_quick_create_enabled = ctx.flag(column, cell)?,
            Col::IsDuplicateDetectionEnabled => {
                record_type.is_duplicate_detection_enabled = ctx.flag(column, cell)?
            }
            Col::IsAuditEnabled => record_type.is_audit_enabled = ctx.flag(column, cell)?,
            Col::ChangeTrackingEnabled => record_type.change_tracking_enabled = ctx.flag(column, cell)?,
            Col::IsVisibleInMobile => record_type.is_visible_in_mobile = ctx.flag(column, cell)?,
            Col::IsVisibleInMobileClient => {
                record_type.is_visible_in_mobile_client = ctx.flag(column, cell)?
            }
            Col::IsReadOnlyInMobileClient => {
                record_type.is_read_only_in_mobile_client = ctx.flag(column, cell)?
            }
            Col::IsAvailableOffline => record_type.is_available_offline = ctx.flag(column, cell)?,
            Col::HelpUrlEnabled => record_type.help_url_enabled = ctx.flag(column, cell)?,
            Col::HelpUrl => record_type.help_url = Some(values::text(cell)),
        }
        Ok(())
    })?;

    Ok(ChangeRequest::CreateRecordType(request))
}
