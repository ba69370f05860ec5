//! Remote method names per service.

use std::fmt;

macro_rules! remote_methods {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

remote_methods! {
    /// Billing service methods.
    BillingMethod {
        AcceptInvite,
        AddOperatingCompany,
        ChangeCodeInOrder,
        ChangeMerchant,
        ChangeMerchantData,
        ChangeMerchantStatus,
        ChangeProject,
        ChangeRoleForAdminUser,
        ChangeRoleForMerchantUser,
        ChangeRoyaltyReport,
        CheckInviteToken,
        CheckProjectRequestSignature,
        CheckSkuAndKeyProject,
        ConfirmUserEmail,
        CreateNotification,
        CreateOrUpdateKeyProduct,
        CreateOrUpdatePaylink,
        CreateOrUpdatePaymentMethod,
        CreateOrUpdatePaymentMethodProductionSettings,
        CreateOrUpdatePaymentMethodTestSettings,
        CreateOrUpdateProduct,
        CreateOrUpdateUserProfile,
        CreatePageReview,
        CreatePayoutDocument,
        CreateRefund,
        CreateToken,
        DeleteAdminUser,
        DeleteKeyProduct,
        DeleteMerchantUser,
        DeleteMoneyBackCostMerchant,
        DeleteMoneyBackCostSystem,
        DeletePaylink,
        DeletePaymentChannelCostMerchant,
        DeletePaymentChannelCostSystem,
        DeletePaymentMethodProductionSettings,
        DeletePaymentMethodTestSettings,
        DeleteProduct,
        DeleteProject,
        FindAllOrdersPublic,
        FindByZipCode,
        GetAdminUsers,
        GetAllMoneyBackCostMerchant,
        GetAllMoneyBackCostSystem,
        GetAllPaymentChannelCostMerchant,
        GetAllPaymentChannelCostSystem,
        GetAvailableKeysCount,
        GetCommonUserProfile,
        GetCountriesList,
        GetCountry,
        GetDashboardBaseReport,
        GetDashboardMainReport,
        GetDashboardRevenueDynamicsReport,
        GetKeyByID,
        GetKeyProduct,
        GetKeyProductInfo,
        GetKeyProducts,
        GetMerchantAgreementSignUrl,
        GetMerchantBalance,
        GetMerchantBy,
        GetMerchantOnboardingCompleteData,
        GetMerchantTariffRates,
        GetMerchantUsers,
        GetMerchantsForUser,
        GetMoneyBackCostMerchant,
        GetMoneyBackCostSystem,
        GetNotification,
        GetOperatingCompaniesList,
        GetOperatingCompany,
        GetOrderPublic,
        GetPaylink,
        GetPaylinkStatByCountry,
        GetPaylinkStatByDate,
        GetPaylinkStatByReferrer,
        GetPaylinkStatByUtm,
        GetPaylinkStatTotal,
        GetPaylinkURL,
        GetPaylinks,
        GetPaymentChannelCostMerchant,
        GetPaymentChannelCostSystem,
        GetPaymentMethodProductionSettings,
        GetPaymentMethodTestSettings,
        GetPayoutDocuments,
        GetPermissionsForUser,
        GetPlatforms,
        GetPriceGroupByCountry,
        GetPriceGroupCurrencies,
        GetPriceGroupCurrencyByRegion,
        GetPriceGroupRecommendedPrice,
        GetProduct,
        GetProductPrices,
        GetProject,
        GetRecommendedPriceByConversion,
        GetRecommendedPriceByPriceGroup,
        GetRefund,
        GetRoleList,
        GetRoyaltyReport,
        GetUserProfile,
        GetVatReportTransactions,
        GetVatReportsDashboard,
        GetVatReportsForCountry,
        IncrPaylinkVisits,
        InviteUserAdmin,
        InviteUserMerchant,
        IsOrderCanBePaying,
        ListMerchants,
        ListNotifications,
        ListProducts,
        ListProjects,
        ListRefunds,
        ListRoyaltyReportOrders,
        ListRoyaltyReports,
        MarkNotificationAsRead,
        MerchantReviewRoyaltyReport,
        OrderCreateByPaylink,
        OrderCreateProcess,
        OrderReCreateProcess,
        OrderReceipt,
        PaymentCallbackProcess,
        PaymentCreateProcess,
        PaymentFormJsonDataProcess,
        PaymentFormLanguageChanged,
        PaymentFormPaymentAccountChanged,
        PaymentFormPlatformChanged,
        ProcessBillingAddress,
        ProcessRefundCallback,
        PublishKeyProduct,
        ResendInviteAdmin,
        ResendInviteMerchant,
        SendWebhookToMerchant,
        SetMerchantS3Agreement,
        SetMerchantTariffRates,
        SetMoneyBackCostMerchant,
        SetMoneyBackCostSystem,
        SetPaymentChannelCostMerchant,
        SetPaymentChannelCostSystem,
        SetPaymentMinLimitSystem,
        SetUserNotifyNewRegion,
        SetUserNotifySales,
        UnPublishKeyProduct,
        UpdatePayoutDocument,
        UpdateProductPrices,
        UpdateVatReportStatus,
        UploadKeysFile,
    }
}

remote_methods! {
    /// Tax service methods.
    TaxMethod {
        GetRates,
        CreateOrUpdate,
        DeleteRateById,
    }
}

remote_methods! {
    /// Geo-IP service methods.
    GeoMethod {
        GetIpData,
    }
}

remote_methods! {
    /// Reporter service methods.
    ReporterMethod {
        CreateFile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_match_variants() {
        assert_eq!(BillingMethod::GetKeyByID.as_str(), "GetKeyByID");
        assert_eq!(BillingMethod::SetMerchantS3Agreement.to_string(), "SetMerchantS3Agreement");
        assert_eq!(TaxMethod::DeleteRateById.as_str(), "DeleteRateById");
        assert_eq!(GeoMethod::GetIpData.as_str(), "GetIpData");
        assert_eq!(ReporterMethod::CreateFile.as_str(), "CreateFile");
    }
}
